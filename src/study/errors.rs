use thiserror::Error;

use super::models::{Score, TermId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    #[error("Term not found: {0}")]
    TermNotFound(TermId),

    #[error("Term {0} already exists")]
    DuplicateTerm(TermId),

    #[error("Cycle {cycle} is complete and was not reset; reset it before studying")]
    IncompleteCycle { cycle: u32 },

    #[error("Cycle {cycle} is still in progress ({sessions}/{cycle_length} sessions)")]
    CycleInProgress {
        cycle: u32,
        sessions: u32,
        cycle_length: u32,
    },

    #[error("{0} terms have no score; score them before creating the set")]
    UnscoredTerms(usize),

    #[error("Invalid set: {0}")]
    InvalidSet(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StudyError>;

/// A score with no cadence configuration was found. Not fatal: a queue is
/// created for it and the condition is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnconfiguredScore {
    pub score: Score,
    /// Term whose score introduced the queue, if any
    pub term: Option<TermId>,
}

impl std::fmt::Display for UnconfiguredScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.term {
            Some(term) => write!(f, "score {} is not configured (found on term {})", self.score, term),
            None => write!(f, "score {} is not configured", self.score),
        }
    }
}
