//! Per-score review queues
//!
//! Each score owns an ordered queue of term ids. The front of a queue is the
//! next term due for review at that score's cadence.

use std::collections::{BTreeMap, HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::errors::{Result, StudyError, UnconfiguredScore};
use super::models::{Score, TermId, TierConfig};
use super::terms::TermStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreQueues {
    queues: BTreeMap<Score, VecDeque<TermId>>,
}

impl ScoreQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build queues from the scores in `terms`, each queue shuffled
    pub fn from_terms<R: Rng + ?Sized>(terms: &TermStore, rng: &mut R) -> Self {
        let mut queues = Self::new();
        for (id, term) in terms.iter() {
            queues.queues.entry(term.score).or_default().push_back(id);
        }
        for queue in queues.queues.values_mut() {
            queue.make_contiguous().shuffle(rng);
        }
        queues
    }

    pub fn queue_for(&self, score: Score) -> Option<&VecDeque<TermId>> {
        self.queues.get(&score)
    }

    /// Number of terms queued at `score`
    pub fn population(&self, score: Score) -> usize {
        self.queues.get(&score).map_or(0, VecDeque::len)
    }

    pub fn populations(&self) -> BTreeMap<Score, usize> {
        self.queues.iter().map(|(score, queue)| (*score, queue.len())).collect()
    }

    pub fn scores(&self) -> impl Iterator<Item = Score> + '_ {
        self.queues.keys().copied()
    }

    pub fn total(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Create an empty queue for `score` if none exists.
    ///
    /// Returns a warning when the score has no configuration.
    pub fn ensure(&mut self, score: Score, config: &TierConfig) -> Option<UnconfiguredScore> {
        if self.queues.contains_key(&score) {
            return None;
        }
        self.queues.insert(score, VecDeque::new());

        if config.is_configured(score) {
            None
        } else {
            log::warn!("Score {} is not configured; created a new queue for it", score);
            Some(UnconfiguredScore { score, term: None })
        }
    }

    /// Move the front term to the back and return it
    pub fn rotate(&mut self, score: Score) -> Option<TermId> {
        let queue = self.queues.get_mut(&score)?;
        let id = queue.pop_front()?;
        queue.push_back(id);
        Some(id)
    }

    pub fn insert_front(&mut self, score: Score, id: TermId) {
        self.queues.entry(score).or_default().push_front(id);
    }

    pub fn append_back(&mut self, score: Score, id: TermId) {
        self.queues.entry(score).or_default().push_back(id);
    }

    /// Remove `id` from the queue of `score`. Returns whether it was present.
    pub fn remove(&mut self, score: Score, id: TermId) -> bool {
        let Some(queue) = self.queues.get_mut(&score) else {
            return false;
        };
        match queue.iter().position(|queued| *queued == id) {
            Some(pos) => {
                queue.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove `id` from whichever queue holds it
    pub fn remove_anywhere(&mut self, id: TermId) -> Option<Score> {
        let score = self
            .queues
            .iter()
            .find(|(_, queue)| queue.contains(&id))
            .map(|(score, _)| *score)?;
        self.remove(score, id);
        Some(score)
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, score: Score, rng: &mut R) {
        if let Some(queue) = self.queues.get_mut(&score) {
            queue.make_contiguous().shuffle(rng);
        }
    }

    /// Rewrite every queued id through `map`
    pub fn remap(&mut self, map: impl Fn(TermId) -> TermId) {
        for queue in self.queues.values_mut() {
            for id in queue.iter_mut() {
                *id = map(*id);
            }
        }
    }

    /// Immutable copy of all (score, term) memberships in queue order
    pub fn snapshot(&self) -> Vec<(Score, TermId)> {
        self.queues
            .iter()
            .flat_map(|(score, queue)| queue.iter().map(move |id| (*score, *id)))
            .collect()
    }

    /// Check that the queues partition the store: every term queued exactly
    /// once, in the queue of its current score, and nothing else queued.
    pub fn validate(&self, terms: &TermStore) -> Result<()> {
        let mut seen = HashSet::with_capacity(terms.len());
        for (score, id) in self.snapshot() {
            if !seen.insert(id) {
                return Err(StudyError::InvalidSet(format!("term {} is queued more than once", id)));
            }
            let term = terms
                .get(id)
                .map_err(|_| StudyError::InvalidSet(format!("queued term {} is not in the set", id)))?;
            if term.score != score {
                return Err(StudyError::InvalidSet(format!(
                    "term {} has score {} but is queued at {}",
                    id, term.score, score
                )));
            }
        }
        if seen.len() != terms.len() {
            return Err(StudyError::InvalidSet(format!(
                "{} terms are not queued",
                terms.len() - seen.len()
            )));
        }
        Ok(())
    }
}
