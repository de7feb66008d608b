//! Set maintenance: deleting, merging and renumbering terms
//!
//! Every operation keeps each term in exactly one queue.

use std::collections::{BTreeMap, HashSet};

use super::errors::{Result, StudyError};
use super::models::{Term, TermId};
use super::set::StudySet;
use super::terms::TermStore;

impl StudySet {
    /// Remove a term from the store and from its queue
    pub fn delete_term(&mut self, id: TermId) -> Result<Term> {
        let term = self.terms.remove(id)?;
        if !self.queues.remove(term.score, id) {
            self.queues.remove_anywhere(id);
        }
        log::info!("Deleted term {} ({}) from '{}'", id, term.term, self.name);
        Ok(term)
    }

    /// Fold `others` into `target`: texts and definitions are joined with
    /// `"; "`, sources concatenated and statistics summed. The folded terms
    /// are deleted.
    pub fn merge_terms(&mut self, target: TermId, others: &[TermId]) -> Result<&Term> {
        self.terms.get(target)?;
        let mut distinct = HashSet::with_capacity(others.len());
        for id in others {
            if *id == target {
                return Err(StudyError::InvalidSet(format!("cannot merge term {} into itself", id)));
            }
            if !distinct.insert(*id) {
                return Err(StudyError::InvalidSet(format!("term {} is listed more than once", id)));
            }
            self.terms.get(*id)?;
        }

        for id in others {
            let origin = self.delete_term(*id)?;
            let merged = self.terms.get_mut(target)?;
            merged.term = format!("{}; {}", merged.term, origin.term);
            merged.definition = format!("{}; {}", merged.definition, origin.definition);
            merged.sources.extend(origin.sources);
            merged.stats.seen += origin.stats.seen;
            merged.stats.missed += origin.stats.missed;
            merged.stats.learned = match (merged.stats.learned, origin.stats.learned) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }

        self.terms.get(target)
    }

    /// Renumber terms 1..N in id order, closing gaps left by deletions.
    ///
    /// Returns the old -> new id mapping.
    pub fn reindex(&mut self) -> BTreeMap<TermId, TermId> {
        let mapping: BTreeMap<TermId, TermId> = self
            .terms
            .all_ids()
            .enumerate()
            .map(|(i, old)| (old, TermId(i as u64 + 1)))
            .collect();

        let terms = std::mem::take(&mut self.terms);
        self.terms = terms
            .iter()
            .map(|(old, term)| (mapping[&old], term.clone()))
            .collect::<TermStore>();
        self.queues.remap(|old| mapping.get(&old).copied().unwrap_or(old));

        log::info!("Reindexed {} terms in '{}'", mapping.len(), self.name);
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::models::{Score, TierConfig};
    use crate::study::set::NewTerm;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn set() -> StudySet {
        let mut rng = StdRng::seed_from_u64(51);
        let terms = ["מֶלֶךְ", "דָּבָר", "יוֹם", "אִישׁ", "עַם"]
            .iter()
            .enumerate()
            .map(|(i, text)| NewTerm {
                term: text.to_string(),
                definition: format!("gloss {}", i),
                sources: vec![format!("lex{}", i)],
                score: Some(Score(i as u32 % 3)),
                ..Default::default()
            })
            .collect();
        StudySet::create("maint".into(), terms, TierConfig::default(), None, Utc::now(), &mut rng).unwrap()
    }

    #[test]
    fn test_delete_term() {
        let mut set = set();
        let removed = set.delete_term(TermId(2)).unwrap();
        assert_eq!(removed.term, "דָּבָר");
        assert!(!set.terms.contains(TermId(2)));
        set.validate().unwrap();
        assert!(set.delete_term(TermId(2)).is_err());
    }

    #[test]
    fn test_merge_terms() {
        let mut set = set();
        set.terms.get_mut(TermId(4)).unwrap().stats.seen = 3;

        let merged = set.merge_terms(TermId(1), &[TermId(4)]).unwrap().clone();
        assert_eq!(merged.term, "מֶלֶךְ; אִישׁ");
        assert_eq!(merged.definition, "gloss 0; gloss 3");
        assert_eq!(merged.sources, vec!["lex0".to_string(), "lex3".to_string()]);
        assert_eq!(merged.stats.seen, 3);
        assert_eq!(set.terms.len(), 4);
        set.validate().unwrap();
    }

    #[test]
    fn test_merge_checks_ids_first() {
        let mut set = set();
        let before = set.clone();
        assert!(set.merge_terms(TermId(1), &[TermId(2), TermId(42)]).is_err());
        assert!(set.merge_terms(TermId(1), &[TermId(1)]).is_err());
        assert_eq!(set, before);
    }

    #[test]
    fn test_merge_rejects_repeated_ids() {
        let mut set = set();
        let before = set.clone();
        let result = set.merge_terms(TermId(1), &[TermId(2), TermId(2)]);
        assert!(matches!(result, Err(StudyError::InvalidSet(_))));
        assert_eq!(set, before);
    }

    #[test]
    fn test_reindex_closes_gaps() {
        let mut set = set();
        set.delete_term(TermId(1)).unwrap();
        set.delete_term(TermId(3)).unwrap();

        let mapping = set.reindex();
        assert_eq!(mapping[&TermId(2)], TermId(1));
        assert_eq!(mapping[&TermId(4)], TermId(2));
        assert_eq!(mapping[&TermId(5)], TermId(3));
        assert_eq!(set.terms.all_ids().collect::<Vec<_>>(), vec![TermId(1), TermId(2), TermId(3)]);
        assert_eq!(set.terms.get(TermId(1)).unwrap().term, "דָּבָר");
        set.validate().unwrap();
    }
}
