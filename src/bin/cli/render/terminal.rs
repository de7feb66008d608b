use std::collections::BTreeMap;

use mahir_lib::study::Score;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap text in an ANSI color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Color for a score: red while new, yellow while live, green once known
pub fn score_color(score: Score) -> &'static str {
    if score == Score::NEW {
        Color::RED
    } else if score.is_known() {
        Color::GREEN
    } else {
        Color::YELLOW
    }
}

/// "0:12 1:5 3:40" style summary of per-score counts
pub fn score_counts(counts: &BTreeMap<Score, usize>) -> String {
    if counts.is_empty() {
        return "-".to_string();
    }
    counts
        .iter()
        .map(|(score, count)| format!("{}:{}", score, count))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a duration as "1h 04m" or "12m 30s"
pub fn duration(d: chrono::Duration) -> String {
    let secs = d.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else {
        format!("{}m {:02}s", m, s)
    }
}
