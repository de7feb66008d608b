//! Tiered spaced-repetition scheduling for Mahir
//!
//! This module provides:
//! - Scored terms and one review queue per score
//! - Deck construction with per-tier quotas
//! - Study cycles with baseline capture and queue resets
//! - Session lifecycle and post-session recalibration
//! - Set maintenance and deck simulation

pub mod cycle;
pub mod deck;
pub mod errors;
mod maintenance;
pub mod models;
pub mod queues;
pub mod recalibrate;
pub mod session;
pub mod set;
pub mod simulate;
pub mod terms;

pub use cycle::{CycleReset, CycleStatus};
pub use deck::Deck;
pub use errors::{StudyError, UnconfiguredScore};
pub use models::*;
pub use recalibrate::{Recalibration, ScoreChange};
pub use session::{Session, SessionOutcome};
pub use set::{NewTerm, SetStatus, StudySet};
pub use simulate::{simulate, ScoreOccurrence, SimulationReport};
