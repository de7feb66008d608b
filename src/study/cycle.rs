//! Review cycle tracking
//!
//! A cycle is `cycle_length` sessions. Once it is complete no deck can be
//! built until the caller resets it, which recaptures the baselines of the
//! long-interval scores.

use rand::Rng;
use serde::Serialize;

use super::errors::{Result, StudyError};
use super::models::{Baseline, CycleState, Score, Tier, TierConfig};
use super::queues::ScoreQueues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CycleStatus {
    Active,
    Complete,
}

/// Outcome of a cycle reset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReset {
    /// The cycle that just started
    pub cycle: u32,
    /// Scores whose baseline was recaptured, with the new count
    pub recaptured: Vec<(Score, usize)>,
    /// Scores whose queue was reshuffled
    pub shuffled: Vec<Score>,
}

pub fn check_cycle_boundary(state: &CycleState, cycle_length: u32) -> CycleStatus {
    if state.sessions == 0 || state.sessions < cycle_length {
        CycleStatus::Active
    } else {
        CycleStatus::Complete
    }
}

/// Capture the baseline of every long-interval score from its live queue
pub fn capture_baselines(state: &mut CycleState, queues: &ScoreQueues) {
    for score in queues.scores() {
        if matches!(score.tier(), Tier::Spread { .. }) {
            state.baselines.insert(
                score,
                Baseline {
                    count: queues.population(score),
                    since_cycle: state.cycle,
                },
            );
        }
    }
}

/// Start the next cycle.
///
/// With `keep` the current parameters carry over: the cycle number advances,
/// the session count returns to zero and each long-interval score whose reset
/// cadence divides the new cycle number gets its baseline recaptured (and its
/// queue shuffled if configured). Declining leaves the state untouched and
/// reports it as incomplete, so no deck is built against stale baselines.
pub fn reset_cycle<R: Rng + ?Sized>(
    state: &mut CycleState,
    config: &TierConfig,
    queues: &mut ScoreQueues,
    keep: bool,
    rng: &mut R,
) -> Result<CycleReset> {
    if check_cycle_boundary(state, config.cycle_length) == CycleStatus::Active {
        return Err(StudyError::CycleInProgress {
            cycle: state.cycle,
            sessions: state.sessions,
            cycle_length: config.cycle_length,
        });
    }
    if !keep {
        log::warn!("Cycle {} complete but reset declined; parameters must be changed manually", state.cycle);
        return Err(StudyError::IncompleteCycle { cycle: state.cycle });
    }

    state.cycle += 1;
    state.sessions = 0;

    let mut reset = CycleReset {
        cycle: state.cycle,
        ..Default::default()
    };

    let scores: Vec<Score> = queues.scores().collect();
    for score in scores {
        if !matches!(score.tier(), Tier::Spread { .. }) {
            continue;
        }
        if state.cycle % config.reset_every(score) != 0 {
            continue;
        }
        if config.shuffles(score) {
            queues.shuffle(score, rng);
            reset.shuffled.push(score);
        }
        let count = queues.population(score);
        state.baselines.insert(
            score,
            Baseline {
                count,
                since_cycle: state.cycle,
            },
        );
        reset.recaptured.push((score, count));
    }

    log::info!(
        "Started cycle {} (recaptured {} baselines, shuffled {} queues)",
        reset.cycle,
        reset.recaptured.len(),
        reset.shuffled.len()
    );
    Ok(reset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::models::{ScoreConfig, TermId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn queues() -> ScoreQueues {
        let mut queues = ScoreQueues::new();
        for id in 0..6 {
            queues.append_back(Score(1), TermId(id));
        }
        for id in 10..20 {
            queues.append_back(Score(3), TermId(id));
        }
        for id in 20..24 {
            queues.append_back(Score(4), TermId(id));
        }
        queues
    }

    #[test]
    fn test_cycle_boundary() {
        let mut state = CycleState::default();
        assert_eq!(check_cycle_boundary(&state, 5), CycleStatus::Active);
        for sessions in 1..5 {
            state.sessions = sessions;
            assert_eq!(check_cycle_boundary(&state, 5), CycleStatus::Active);
        }
        state.sessions = 5;
        assert_eq!(check_cycle_boundary(&state, 5), CycleStatus::Complete);
    }

    #[test]
    fn test_reset_recaptures_due_baselines() {
        let config = TierConfig {
            cycle_length: 5,
            ..Default::default()
        };
        let mut queues = queues();
        let mut state = CycleState::default();
        capture_baselines(&mut state, &queues);
        state.sessions = 5;
        // Queues grew during the cycle
        queues.append_back(Score(3), TermId(50));
        queues.append_back(Score(4), TermId(51));

        let mut rng = StdRng::seed_from_u64(11);
        let reset = reset_cycle(&mut state, &config, &mut queues, true, &mut rng).unwrap();

        assert_eq!(reset.cycle, 2);
        assert_eq!(state.sessions, 0);
        assert_eq!(state.baselines[&Score(3)], Baseline { count: 11, since_cycle: 2 });
        // Score 4 resets every 2 cycles, and 2 % 2 == 0
        assert_eq!(state.baselines[&Score(4)], Baseline { count: 5, since_cycle: 2 });
        assert_eq!(reset.shuffled, vec![Score(3), Score(4)]);
        assert!(!state.baselines.contains_key(&Score(1)));

        state.sessions = 5;
        queues.append_back(Score(4), TermId(52));
        let reset = reset_cycle(&mut state, &config, &mut queues, true, &mut rng).unwrap();
        assert_eq!(reset.cycle, 3);
        assert_eq!(reset.recaptured, vec![(Score(3), 11)]);
        assert_eq!(state.baselines[&Score(4)], Baseline { count: 5, since_cycle: 2 });
    }

    #[test]
    fn test_reset_respects_shuffle_flag() {
        let config = TierConfig {
            cycle_length: 2,
            scores: vec![ScoreConfig {
                score: Score(3),
                reset_every: 1,
                shuffle: false,
            }],
            ..Default::default()
        };
        let mut queues = queues();
        let before = queues.queue_for(Score(3)).cloned();
        let mut state = CycleState {
            sessions: 2,
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(12);
        let reset = reset_cycle(&mut state, &config, &mut queues, true, &mut rng).unwrap();
        assert!(reset.shuffled.is_empty());
        assert_eq!(queues.queue_for(Score(3)).cloned(), before);
    }

    #[test]
    fn test_declined_reset_blocks() {
        let config = TierConfig {
            cycle_length: 3,
            ..Default::default()
        };
        let mut queues = queues();
        let mut state = CycleState {
            sessions: 3,
            ..Default::default()
        };
        let untouched = state.clone();

        let mut rng = StdRng::seed_from_u64(13);
        let result = reset_cycle(&mut state, &config, &mut queues, false, &mut rng);
        assert_eq!(result.unwrap_err(), StudyError::IncompleteCycle { cycle: 1 });
        assert_eq!(state, untouched);
        assert_eq!(check_cycle_boundary(&state, config.cycle_length), CycleStatus::Complete);
    }

    #[test]
    fn test_reset_refused_mid_cycle() {
        let config = TierConfig::default();
        let mut queues = queues();
        let mut state = CycleState {
            sessions: 4,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(14);
        let result = reset_cycle(&mut state, &config, &mut queues, true, &mut rng);
        assert!(matches!(result, Err(StudyError::CycleInProgress { .. })));
    }
}
