//! Deck construction
//!
//! Quotas per score tier:
//! - 0: `new_quota` terms taken from the front of the queue, which is not
//!   advanced. New terms stay due until they are rescored.
//! - 1: half the live queue, rounded up (every other session)
//! - 2: a quarter of the live queue, rounded up (every 4 sessions)
//! - k >= 3: the baseline captured at the last reset, spread evenly over
//!   `cycle_length * 2^(k-3)` sessions
//!
//! Every drawn term of a tier above 0 is rotated to the back of its queue.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::cycle::{check_cycle_boundary, CycleStatus};
use super::errors::{Result, StudyError};
use super::models::{Baseline, CycleState, Score, TermId, Tier, TierConfig};
use super::queues::ScoreQueues;

/// Terms selected for one study session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Shuffled review order
    pub terms: Vec<TermId>,
    /// Terms drawn per score
    pub stats: BTreeMap<Score, usize>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Number of terms drawn from a spread tier at the next session.
///
/// `position` counts sessions since the baseline was captured, starting at 1.
/// The draws up to a position are `floor(count * position / span)`, so each
/// session takes the difference between consecutive positions and a full span
/// draws exactly `count` terms.
fn spread_quota(baseline: Baseline, span_cycles: u32, cycle: &CycleState, cycle_length: u32) -> usize {
    let cycle_length = u128::from(cycle_length.max(1));
    let span = cycle_length * u128::from(span_cycles.max(1));
    let elapsed_cycles = u128::from(cycle.cycle.saturating_sub(baseline.since_cycle));
    let position = elapsed_cycles * cycle_length + u128::from(cycle.sessions) + 1;

    let count = baseline.count as u128;
    let through = count * position / span;
    let before = count * (position - 1) / span;
    (through - before) as usize
}

/// Requested quota for one score, before capping at the queue length
pub fn quota_for(score: Score, queues: &ScoreQueues, config: &TierConfig, cycle: &CycleState) -> usize {
    match score.tier() {
        Tier::New => config.new_quota,
        Tier::Live { divisor } => queues.population(score).div_ceil(divisor as usize),
        Tier::Spread { span_cycles } => {
            spread_quota(cycle.baseline(score), span_cycles, cycle, config.cycle_length)
        }
    }
}

/// Quotas for every queued score, capped at what each queue can deliver.
///
/// With `deck_min` set, score 0 fills the deck up to that size instead of
/// using `new_quota`.
pub fn quotas(queues: &ScoreQueues, config: &TierConfig, cycle: &CycleState) -> BTreeMap<Score, usize> {
    let mut quotas: BTreeMap<Score, usize> = queues
        .scores()
        .filter(|score| score.tier() != Tier::New)
        .map(|score| {
            let quota = quota_for(score, queues, config, cycle).min(queues.population(score));
            (score, quota)
        })
        .collect();

    let new_quota = match config.deck_min {
        Some(deck_min) => deck_min.saturating_sub(quotas.values().sum()),
        None => config.new_quota,
    };
    quotas.insert(Score::NEW, new_quota.min(queues.population(Score::NEW)));
    quotas
}

/// Draw the next deck, advancing the queues of reviewed tiers.
///
/// Refuses to build against a completed cycle whose baselines have not been
/// recaptured.
pub fn build_deck<R: Rng + ?Sized>(
    queues: &mut ScoreQueues,
    config: &TierConfig,
    cycle: &CycleState,
    rng: &mut R,
) -> Result<Deck> {
    if check_cycle_boundary(cycle, config.cycle_length) == CycleStatus::Complete {
        return Err(StudyError::IncompleteCycle { cycle: cycle.cycle });
    }

    let mut deck = Deck::default();

    for (score, quota) in quotas(queues, config, cycle) {
        let drawn = match score.tier() {
            Tier::New => {
                let front: Vec<TermId> = queues
                    .queue_for(score)
                    .map(|queue| queue.iter().take(quota).copied().collect())
                    .unwrap_or_default();
                deck.terms.extend_from_slice(&front);
                front.len()
            }
            _ => {
                let mut drawn = 0;
                for _ in 0..quota {
                    let Some(id) = queues.rotate(score) else { break };
                    deck.terms.push(id);
                    drawn += 1;
                }
                drawn
            }
        };
        if drawn > 0 {
            deck.stats.insert(score, drawn);
        }
    }

    deck.terms.shuffle(rng);

    log::debug!(
        "Built deck of {} terms for cycle {} session {}",
        deck.len(),
        cycle.cycle,
        cycle.sessions + 1
    );
    Ok(deck)
}
