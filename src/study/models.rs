//! Data models for study sets

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a term within a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Familiarity score of a term. Higher means better known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(pub u32);

impl Score {
    /// Unseen or struggling terms
    pub const NEW: Score = Score(0);
    /// Lowest score counted as learned
    pub const KNOWN: Score = Score(3);

    /// Review cadence that governs how many terms of this score are drawn
    pub fn tier(self) -> Tier {
        match self.0 {
            0 => Tier::New,
            1 => Tier::Live { divisor: 2 },
            2 => Tier::Live { divisor: 4 },
            k => Tier::Spread {
                span_cycles: 1u32.checked_shl(k - 3).unwrap_or(u32::MAX),
            },
        }
    }

    pub fn is_known(self) -> bool {
        self >= Self::KNOWN
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Quota rule for a score tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Fixed daily quota of new terms, drawn from the front without rotating
    New,
    /// Live population divided by `divisor`, rounded up
    Live { divisor: u32 },
    /// Baseline population spread evenly over `span_cycles` cycles
    Spread { span_cycles: u32 },
}

/// Per-term review statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStats {
    /// Number of decks the term appeared in
    #[serde(default)]
    pub seen: u32,
    /// Number of relapses to a lower score
    #[serde(default)]
    pub missed: u32,
    /// When the term first reached a known score without having been missed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learned: Option<DateTime<Utc>>,
}

/// A vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub term: String,
    pub definition: String,
    pub score: Score,
    /// Free-form occurrence note shown next to the definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<String>,
    /// Source citations used by the study front-end
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub stats: TermStats,
}

impl Term {
    pub fn new(term: String, definition: String, score: Score) -> Self {
        Self {
            term,
            definition,
            score,
            occurrences: None,
            sources: Vec::new(),
            stats: TermStats::default(),
        }
    }
}

/// How relapses are counted against a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Every downgrade counts as a miss
    #[default]
    AnyDowngrade,
    /// Only a fall from a known score (>= 3) to an unknown one counts
    KnownRelapse,
}

/// Reset behaviour of one score's queue at cycle boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoreConfig {
    pub score: Score,
    /// Recapture the baseline every `reset_every` cycles
    #[serde(default = "default_reset_every")]
    pub reset_every: u32,
    /// Shuffle the queue when the baseline is recaptured
    #[serde(default)]
    pub shuffle: bool,
}

fn default_reset_every() -> u32 {
    1
}

/// Deck composition parameters of a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TierConfig {
    /// Number of new (score 0) terms per deck
    #[serde(default = "default_new_quota")]
    pub new_quota: usize,
    /// Sessions per cycle
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    /// Legacy mode: fill the deck with new terms up to this size instead of `new_quota`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_min: Option<usize>,
    #[serde(default)]
    pub miss_policy: MissPolicy,
    #[serde(default = "default_scores")]
    pub scores: Vec<ScoreConfig>,
}

fn default_new_quota() -> usize {
    10
}

fn default_cycle_length() -> u32 {
    30
}

fn default_scores() -> Vec<ScoreConfig> {
    vec![
        ScoreConfig { score: Score(0), reset_every: 1, shuffle: false },
        ScoreConfig { score: Score(1), reset_every: 1, shuffle: false },
        ScoreConfig { score: Score(2), reset_every: 1, shuffle: false },
        ScoreConfig { score: Score(3), reset_every: 1, shuffle: true },
        ScoreConfig { score: Score(4), reset_every: 2, shuffle: true },
    ]
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            new_quota: default_new_quota(),
            cycle_length: default_cycle_length(),
            deck_min: None,
            miss_policy: MissPolicy::default(),
            scores: default_scores(),
        }
    }
}

impl TierConfig {
    /// Configuration for `score`, if the set declares one
    pub fn score_config(&self, score: Score) -> Option<&ScoreConfig> {
        self.scores.iter().find(|c| c.score == score)
    }

    pub fn is_configured(&self, score: Score) -> bool {
        self.score_config(score).is_some()
    }

    /// Reset cadence in cycles. Undeclared scores reset once per span.
    pub fn reset_every(&self, score: Score) -> u32 {
        match self.score_config(score) {
            Some(config) => config.reset_every.max(1),
            None => match score.tier() {
                Tier::Spread { span_cycles } => span_cycles.max(1),
                _ => 1,
            },
        }
    }

    pub fn shuffles(&self, score: Score) -> bool {
        self.score_config(score).map(|c| c.shuffle).unwrap_or(false)
    }
}

/// Population of a score captured at a cycle reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub count: usize,
    /// Cycle in which the count was captured
    pub since_cycle: u32,
}

/// Position of a set within its review cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleState {
    /// Current cycle, starting at 1
    pub cycle: u32,
    /// Sessions completed within the current cycle
    pub sessions: u32,
    #[serde(default)]
    pub baselines: std::collections::BTreeMap<Score, Baseline>,
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            cycle: 1,
            sessions: 0,
            baselines: Default::default(),
        }
    }
}

impl CycleState {
    /// Baseline count for `score`, zero if never captured
    pub fn baseline(&self, score: Score) -> Baseline {
        self.baselines.get(&score).copied().unwrap_or(Baseline {
            count: 0,
            since_cycle: self.cycle,
        })
    }
}

/// Statistics of one completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: uuid::Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cycle: u32,
    /// 1-based session number within the cycle
    pub session: u32,
    /// Terms drawn per score
    pub deck: std::collections::BTreeMap<Score, usize>,
    /// Score transitions, keyed `"1->2"` for upgrades and `"0<-1"` for downgrades
    pub changes: std::collections::BTreeMap<String, usize>,
    /// Queue sizes after recalibration
    pub score_counts: std::collections::BTreeMap<Score, usize>,
}

impl SessionRecord {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Terms at a known score after this session
    pub fn learned(&self) -> usize {
        self.score_counts
            .iter()
            .filter(|(score, _)| score.is_known())
            .map(|(_, count)| count)
            .sum()
    }

    /// Terms left at score 0 after this session
    pub fn unlearned(&self) -> usize {
        self.score_counts.get(&Score::NEW).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_classification() {
        assert_eq!(Score(0).tier(), Tier::New);
        assert_eq!(Score(1).tier(), Tier::Live { divisor: 2 });
        assert_eq!(Score(2).tier(), Tier::Live { divisor: 4 });
        assert_eq!(Score(3).tier(), Tier::Spread { span_cycles: 1 });
        assert_eq!(Score(4).tier(), Tier::Spread { span_cycles: 2 });
        assert_eq!(Score(6).tier(), Tier::Spread { span_cycles: 8 });
        assert_eq!(Score(200).tier(), Tier::Spread { span_cycles: u32::MAX });
    }

    #[test]
    fn test_undeclared_score_resets_once_per_span() {
        let config = TierConfig::default();
        assert_eq!(config.reset_every(Score(4)), 2);
        assert_eq!(config.reset_every(Score(5)), 4);
        assert!(!config.shuffles(Score(5)));
        assert!(config.shuffles(Score(3)));
    }

    #[test]
    fn test_score_keys_roundtrip_through_json() {
        let mut state = CycleState::default();
        state.baselines.insert(Score(3), Baseline { count: 30, since_cycle: 1 });

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"3\""));
        let parsed: CycleState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_tier_config_fills_defaults() {
        let config: TierConfig = serde_json::from_str(r#"{"new_quota": 5}"#).unwrap();
        assert_eq!(config.new_quota, 5);
        assert_eq!(config.cycle_length, 30);
        assert_eq!(config.miss_policy, MissPolicy::AnyDowngrade);
        assert_eq!(config.scores.len(), 5);
    }
}
