//! Term store: the source of truth for term attributes
//!
//! Score changes made here never touch the queues. Callers that change a
//! score are responsible for recalibrating afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::{Result, StudyError};
use super::models::{Score, Term, TermId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermStore {
    terms: BTreeMap<TermId, Term>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TermId) -> Result<&Term> {
        self.terms.get(&id).ok_or(StudyError::TermNotFound(id))
    }

    pub fn get_mut(&mut self, id: TermId) -> Result<&mut Term> {
        self.terms.get_mut(&id).ok_or(StudyError::TermNotFound(id))
    }

    /// Set a term's score, returning the previous one
    pub fn set_score(&mut self, id: TermId, score: Score) -> Result<Score> {
        let term = self.get_mut(id)?;
        Ok(std::mem::replace(&mut term.score, score))
    }

    pub fn all_ids(&self) -> impl Iterator<Item = TermId> + '_ {
        self.terms.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &Term)> {
        self.terms.iter().map(|(id, term)| (*id, term))
    }

    pub fn contains(&self, id: TermId) -> bool {
        self.terms.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest id in use
    pub fn max_id(&self) -> Option<TermId> {
        self.terms.keys().next_back().copied()
    }

    pub fn insert(&mut self, id: TermId, term: Term) -> Result<()> {
        if self.terms.contains_key(&id) {
            return Err(StudyError::DuplicateTerm(id));
        }
        self.terms.insert(id, term);
        Ok(())
    }

    pub fn remove(&mut self, id: TermId) -> Result<Term> {
        self.terms.remove(&id).ok_or(StudyError::TermNotFound(id))
    }
}

impl FromIterator<(TermId, Term)> for TermStore {
    fn from_iter<I: IntoIterator<Item = (TermId, Term)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}
