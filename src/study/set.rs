//! A study set: terms, their queues, cycle position and session history

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cycle::{self, capture_baselines, check_cycle_boundary, CycleReset, CycleStatus};
use super::deck;
use super::errors::{Result, StudyError, UnconfiguredScore};
use super::models::{CycleState, Score, SessionRecord, Term, TermId, TierConfig};
use super::queues::ScoreQueues;
use super::terms::TermStore;

/// A term to be added to a set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTerm {
    pub term: String,
    pub definition: String,
    pub occurrences: Option<String>,
    pub sources: Vec<String>,
    pub score: Option<Score>,
}

impl NewTerm {
    fn into_term(self, score: Score) -> Term {
        let mut term = Term::new(self.term, self.definition, score);
        term.occurrences = self.occurrences;
        term.sources = self.sources;
        term
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub config: TierConfig,
    pub cycle: CycleState,
    pub terms: TermStore,
    pub queues: ScoreQueues,
    #[serde(default)]
    pub history: Vec<SessionRecord>,
}

/// Overview of a set's current state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatus {
    pub name: String,
    pub terms: usize,
    pub cycle: u32,
    pub sessions: u32,
    pub cycle_length: u32,
    pub cycle_status: CycleStatus,
    pub populations: BTreeMap<Score, usize>,
    /// Quotas of the next session; empty while the cycle awaits a reset
    pub next_quotas: BTreeMap<Score, usize>,
    pub learned: usize,
    pub unlearned: usize,
    pub sessions_recorded: usize,
}

impl StudySet {
    /// Create a set from scored terms.
    ///
    /// Terms without a score take `default_score`; if that is absent any
    /// unscored term rejects the set. Ids are assigned 1..N in input order and
    /// every queue starts shuffled.
    pub fn create<R: Rng + ?Sized>(
        name: String,
        new_terms: Vec<NewTerm>,
        config: TierConfig,
        default_score: Option<Score>,
        created_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self> {
        validate_config(&config)?;

        let unscored = new_terms.iter().filter(|t| t.score.is_none()).count();
        if unscored > 0 && default_score.is_none() {
            return Err(StudyError::UnscoredTerms(unscored));
        }

        let terms: TermStore = new_terms
            .into_iter()
            .enumerate()
            .map(|(i, new_term)| {
                let score = new_term.score.or(default_score).unwrap_or(Score::NEW);
                (TermId(i as u64 + 1), new_term.into_term(score))
            })
            .collect();

        let queues = ScoreQueues::from_terms(&terms, rng);
        let mut cycle = CycleState::default();
        capture_baselines(&mut cycle, &queues);

        let set = Self {
            name,
            created_at,
            config,
            cycle,
            terms,
            queues,
            history: Vec::new(),
        };
        for warning in set.unconfigured_scores() {
            log::warn!("{}; its queue uses the default cadence", warning);
        }

        log::info!("Created set '{}' with {} terms", set.name, set.terms.len());
        Ok(set)
    }

    /// Queued scores that have no cadence configuration
    pub fn unconfigured_scores(&self) -> Vec<UnconfiguredScore> {
        self.queues
            .scores()
            .filter(|score| !self.config.is_configured(*score))
            .map(|score| UnconfiguredScore { score, term: None })
            .collect()
    }

    /// Check structural consistency of a loaded set
    pub fn validate(&self) -> Result<()> {
        validate_config(&self.config)?;
        if self.cycle.cycle == 0 {
            return Err(StudyError::InvalidSet("cycle numbers start at 1".to_string()));
        }
        self.queues.validate(&self.terms)
    }

    /// Append new terms with score 0 behind the existing new terms
    pub fn add_terms(&mut self, new_terms: Vec<NewTerm>) -> Result<Vec<TermId>> {
        let mut next = self.terms.max_id().map_or(1, |id| id.0 + 1);
        let mut added = Vec::with_capacity(new_terms.len());

        for new_term in new_terms {
            let id = TermId(next);
            self.terms.insert(id, new_term.into_term(Score::NEW))?;
            self.queues.append_back(Score::NEW, id);
            added.push(id);
            next += 1;
        }

        log::info!("Added {} terms to '{}'", added.len(), self.name);
        Ok(added)
    }

    pub fn cycle_status(&self) -> CycleStatus {
        check_cycle_boundary(&self.cycle, self.config.cycle_length)
    }

    /// Reset a completed cycle, see [`cycle::reset_cycle`]
    pub fn reset_cycle<R: Rng + ?Sized>(&mut self, keep: bool, rng: &mut R) -> Result<CycleReset> {
        cycle::reset_cycle(&mut self.cycle, &self.config, &mut self.queues, keep, rng)
    }

    /// Replace the cycle parameters. Takes effect from the next reset.
    pub fn set_parameters(&mut self, cycle_length: Option<u32>, new_quota: Option<usize>) -> Result<()> {
        let mut config = self.config.clone();
        if let Some(cycle_length) = cycle_length {
            config.cycle_length = cycle_length;
        }
        if let Some(new_quota) = new_quota {
            config.new_quota = new_quota;
        }
        validate_config(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn status(&self) -> SetStatus {
        let populations = self.queues.populations();
        let cycle_status = self.cycle_status();
        let next_quotas = match cycle_status {
            CycleStatus::Active => deck::quotas(&self.queues, &self.config, &self.cycle),
            CycleStatus::Complete => BTreeMap::new(),
        };
        let learned = populations
            .iter()
            .filter(|(score, _)| score.is_known())
            .map(|(_, count)| count)
            .sum();

        SetStatus {
            name: self.name.clone(),
            terms: self.terms.len(),
            cycle: self.cycle.cycle,
            sessions: self.cycle.sessions,
            cycle_length: self.config.cycle_length,
            cycle_status,
            unlearned: populations.get(&Score::NEW).copied().unwrap_or(0),
            populations,
            next_quotas,
            learned,
            sessions_recorded: self.history.len(),
        }
    }
}

fn validate_config(config: &TierConfig) -> Result<()> {
    if config.cycle_length == 0 {
        return Err(StudyError::InvalidConfig("cycle length must be at least 1".to_string()));
    }
    if let Some(bad) = config.scores.iter().find(|c| c.reset_every == 0) {
        return Err(StudyError::InvalidConfig(format!(
            "score {} must reset every 1 or more cycles",
            bad.score
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_term(text: &str, score: Option<u32>) -> NewTerm {
        NewTerm {
            term: text.to_string(),
            definition: format!("{} gloss", text),
            score: score.map(Score),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_rejects_unscored_terms() {
        let mut rng = StdRng::seed_from_u64(21);
        let terms = vec![new_term("a", Some(0)), new_term("b", None), new_term("c", None)];
        let result = StudySet::create("s".into(), terms, TierConfig::default(), None, Utc::now(), &mut rng);
        assert_eq!(result.unwrap_err(), StudyError::UnscoredTerms(2));
    }

    #[test]
    fn test_create_assigns_ids_and_baselines() {
        let mut rng = StdRng::seed_from_u64(22);
        let terms = vec![
            new_term("a", Some(0)),
            new_term("b", Some(3)),
            new_term("c", None),
            new_term("d", Some(3)),
        ];
        let set = StudySet::create(
            "hebrew".into(),
            terms,
            TierConfig::default(),
            Some(Score(1)),
            Utc::now(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(set.terms.len(), 4);
        assert_eq!(set.terms.get(TermId(3)).unwrap().score, Score(1));
        assert_eq!(set.cycle.cycle, 1);
        assert_eq!(set.cycle.baseline(Score(3)).count, 2);
        set.validate().unwrap();
    }

    #[test]
    fn test_create_reports_unconfigured_scores() {
        let mut rng = StdRng::seed_from_u64(26);
        let terms = vec![new_term("a", Some(1)), new_term("b", Some(7)), new_term("c", Some(7))];
        let set = StudySet::create("s".into(), terms, TierConfig::default(), None, Utc::now(), &mut rng).unwrap();

        assert_eq!(
            set.unconfigured_scores(),
            vec![UnconfiguredScore {
                score: Score(7),
                term: None
            }]
        );
        assert_eq!(set.queues.population(Score(7)), 2);
        set.validate().unwrap();
    }

    #[test]
    fn test_add_terms_appends_to_new_queue() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut set = StudySet::create(
            "s".into(),
            vec![new_term("a", Some(0)), new_term("b", Some(1))],
            TierConfig::default(),
            None,
            Utc::now(),
            &mut rng,
        )
        .unwrap();

        let added = set.add_terms(vec![new_term("c", None), new_term("d", Some(3))]).unwrap();
        assert_eq!(added, vec![TermId(3), TermId(4)]);
        let queue = set.queues.queue_for(Score::NEW).unwrap();
        assert_eq!(queue.iter().rev().take(2).copied().collect::<Vec<_>>(), vec![TermId(4), TermId(3)]);
        assert_eq!(set.terms.get(TermId(4)).unwrap().score, Score::NEW);
        set.validate().unwrap();
    }

    #[test]
    fn test_set_parameters_validates() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut set =
            StudySet::create("s".into(), vec![], TierConfig::default(), None, Utc::now(), &mut rng).unwrap();
        assert!(set.set_parameters(Some(0), None).is_err());
        set.set_parameters(Some(12), Some(3)).unwrap();
        assert_eq!(set.config.cycle_length, 12);
        assert_eq!(set.config.new_quota, 3);
    }

    #[test]
    fn test_status_reports_learned_counts() {
        let mut rng = StdRng::seed_from_u64(25);
        let terms = vec![
            new_term("a", Some(0)),
            new_term("b", Some(0)),
            new_term("c", Some(3)),
            new_term("d", Some(4)),
            new_term("e", Some(2)),
        ];
        let set = StudySet::create("s".into(), terms, TierConfig::default(), None, Utc::now(), &mut rng).unwrap();

        let status = set.status();
        assert_eq!(status.terms, 5);
        assert_eq!(status.learned, 2);
        assert_eq!(status.unlearned, 2);
        assert_eq!(status.cycle_status, CycleStatus::Active);
        assert_eq!(status.next_quotas[&Score(0)], 2);
        assert_eq!(status.next_quotas[&Score(2)], 1);
    }
}
