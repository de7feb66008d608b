//! Study session lifecycle
//!
//! A session works on its own copy of the set. Scores recorded during the
//! session only reach the caller through [`Session::finish`]; dropping an
//! unfinished session discards every edit, leaving the stored set as it was.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::deck::{build_deck, Deck};
use super::errors::{Result, UnconfiguredScore};
use super::models::{Score, SessionRecord, Term, TermId};
use super::recalibrate::recalibrate;
use super::set::StudySet;

pub struct Session {
    set: StudySet,
    deck: Deck,
    started_at: DateTime<Utc>,
}

/// A finished session: the updated set, ready to be persisted as a whole
#[derive(Debug)]
pub struct SessionOutcome {
    pub set: StudySet,
    pub record: SessionRecord,
    pub warnings: Vec<UnconfiguredScore>,
}

impl Session {
    /// Build the next deck on a copy of `set`.
    ///
    /// Fails with `IncompleteCycle` while the set's cycle awaits a reset.
    pub fn begin<R: Rng + ?Sized>(set: &StudySet, started_at: DateTime<Utc>, rng: &mut R) -> Result<Self> {
        let mut set = set.clone();
        let deck = build_deck(&mut set.queues, &set.config, &set.cycle, rng)?;

        log::info!(
            "Session {} of cycle {} for '{}': {} terms",
            set.cycle.sessions + 1,
            set.cycle.cycle,
            set.name,
            deck.len()
        );
        Ok(Self { set, deck, started_at })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// 1-based number of this session within its cycle
    pub fn number(&self) -> u32 {
        self.set.cycle.sessions + 1
    }

    pub fn set_name(&self) -> &str {
        &self.set.name
    }

    pub fn term(&self, id: TermId) -> Result<&Term> {
        self.set.terms.get(id)
    }

    /// Record a new score for any term of the set, returning the previous one
    pub fn record_score(&mut self, id: TermId, score: Score) -> Result<Score> {
        self.set.terms.set_score(id, score)
    }

    /// Complete the session: count the deck as seen, move rescored terms to
    /// their new queues and log the session in the set's history.
    pub fn finish(self, finished_at: DateTime<Utc>) -> Result<SessionOutcome> {
        let Session {
            mut set,
            deck,
            started_at,
        } = self;

        for id in &deck.terms {
            set.terms.get_mut(*id)?.stats.seen += 1;
        }

        let recalibration = recalibrate(&mut set.terms, &mut set.queues, &set.config, finished_at)?;

        let record = SessionRecord {
            id: uuid::Uuid::new_v4(),
            started_at,
            finished_at,
            cycle: set.cycle.cycle,
            session: set.cycle.sessions + 1,
            deck: deck.stats.clone(),
            changes: recalibration.change_labels(),
            score_counts: set.queues.populations(),
        };

        set.cycle.sessions += 1;
        set.history.push(record.clone());

        log::info!(
            "Finished session {} of cycle {} for '{}' ({} score changes)",
            record.session,
            record.cycle,
            set.name,
            recalibration.moved()
        );
        Ok(SessionOutcome {
            set,
            record,
            warnings: recalibration.warnings,
        })
    }
}
