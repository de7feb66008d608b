//! Queue recalibration after a study session
//!
//! Scores are edited on the term store during a session while the queues stay
//! as they were. Recalibration moves every rescored term to the queue of its
//! new score. Terms falling back to score 0 go to the front of that queue so
//! they are reviewed immediately; every other move goes to the back.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use super::errors::{Result, UnconfiguredScore};
use super::models::{MissPolicy, Score, TermId, TierConfig};
use super::queues::ScoreQueues;
use super::terms::TermStore;

/// A term's move between two scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScoreChange {
    pub from: Score,
    pub to: Score,
}

impl ScoreChange {
    pub fn is_upgrade(&self) -> bool {
        self.to > self.from
    }
}

impl fmt::Display for ScoreChange {
    /// Upgrades read `1->2`, downgrades `0<-1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_upgrade() {
            write!(f, "{}->{}", self.from, self.to)
        } else {
            write!(f, "{}<-{}", self.to, self.from)
        }
    }
}

/// Result of reconciling queues with live scores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recalibration {
    pub changes: BTreeMap<ScoreChange, usize>,
    pub warnings: Vec<UnconfiguredScore>,
}

impl Recalibration {
    pub fn moved(&self) -> usize {
        self.changes.values().sum()
    }

    /// Change counts keyed by their display form
    pub fn change_labels(&self) -> BTreeMap<String, usize> {
        self.changes
            .iter()
            .map(|(change, count)| (change.to_string(), *count))
            .collect()
    }
}

struct Move {
    id: TermId,
    change: ScoreChange,
}

fn counts_as_miss(change: ScoreChange, policy: MissPolicy) -> bool {
    if change.is_upgrade() {
        return false;
    }
    match policy {
        MissPolicy::AnyDowngrade => true,
        MissPolicy::KnownRelapse => change.from.is_known() && !change.to.is_known(),
    }
}

/// Move rescored terms to their new queues and update their statistics.
///
/// All moves are computed from a snapshot before anything is changed, so a
/// queued id missing from the store fails the call without touching either
/// structure.
pub fn recalibrate(
    terms: &mut TermStore,
    queues: &mut ScoreQueues,
    config: &TierConfig,
    now: DateTime<Utc>,
) -> Result<Recalibration> {
    let mut moves = Vec::new();
    for (queued_at, id) in queues.snapshot() {
        let live = terms.get(id)?.score;
        if live != queued_at {
            moves.push(Move {
                id,
                change: ScoreChange { from: queued_at, to: live },
            });
        }
    }

    let mut recalibration = Recalibration::default();

    for Move { id, change } in moves {
        if let Some(mut warning) = queues.ensure(change.to, config) {
            warning.term = Some(id);
            recalibration.warnings.push(warning);
        }

        queues.remove(change.from, id);
        if change.to == Score::NEW {
            queues.insert_front(change.to, id);
        } else {
            queues.append_back(change.to, id);
        }
        *recalibration.changes.entry(change).or_default() += 1;

        let stats = &mut terms.get_mut(id)?.stats;
        if counts_as_miss(change, config.miss_policy) {
            stats.missed += 1;
        }
        let became_known = change.to.is_known() && !change.from.is_known();
        if became_known && stats.missed == 0 && stats.learned.is_none() {
            stats.learned = Some(now);
        }
    }

    if recalibration.moved() > 0 {
        log::info!("Recalibrated {} rescored terms", recalibration.moved());
    }
    Ok(recalibration)
}
