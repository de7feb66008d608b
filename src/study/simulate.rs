//! Deck simulation
//!
//! Replays deck construction over many sessions on a copy of a set, with no
//! score changes, to show how often terms of each score come up.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::Serialize;

use super::cycle::CycleStatus;
use super::deck::build_deck;
use super::errors::Result;
use super::models::{Score, TermId};
use super::set::StudySet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOccurrence {
    /// Distinct terms of this score that were drawn
    pub terms: usize,
    /// Total draws across all sessions
    pub draws: usize,
}

impl ScoreOccurrence {
    /// Average draws per drawn term
    pub fn average(&self) -> f64 {
        if self.terms == 0 {
            0.0
        } else {
            self.draws as f64 / self.terms as f64
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub sessions: u32,
    pub deck_sizes: Vec<usize>,
    pub cycles_started: u32,
    pub per_score: BTreeMap<Score, ScoreOccurrence>,
}

pub fn simulate<R: Rng + ?Sized>(set: &StudySet, sessions: u32, rng: &mut R) -> Result<SimulationReport> {
    let mut set = set.clone();
    let mut report = SimulationReport {
        sessions,
        ..Default::default()
    };
    let mut draws: HashMap<TermId, usize> = HashMap::new();

    for _ in 0..sessions {
        if set.cycle_status() == CycleStatus::Complete {
            set.reset_cycle(true, rng)?;
            report.cycles_started += 1;
        }
        let deck = build_deck(&mut set.queues, &set.config, &set.cycle, rng)?;
        for id in &deck.terms {
            *draws.entry(*id).or_default() += 1;
        }
        report.deck_sizes.push(deck.len());
        set.cycle.sessions += 1;
    }

    for (id, count) in draws {
        let score = set.terms.get(id)?.score;
        let occurrence = report.per_score.entry(score).or_default();
        occurrence.terms += 1;
        occurrence.draws += count;
    }

    Ok(report)
}
