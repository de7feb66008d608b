use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use mahir_lib::import::load_terms;
use mahir_lib::study::{Score, StudySet};

use crate::app::App;
use crate::render::{paint, score_counts, Color};
use crate::OutputFormat;

/// Overrides of the configured defaults for a new set
pub struct Params {
    pub default_score: Option<u32>,
    pub cycle_length: Option<u32>,
    pub new_quota: Option<usize>,
    pub deck_min: Option<usize>,
}

pub fn run(
    app: &App,
    name: &str,
    file: &Path,
    params: Params,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    if app.storage.exists(name) {
        bail!("Set '{}' already exists", name);
    }

    let terms = load_terms(file, app.config.delimiter)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut config = app.config.defaults.clone();
    if let Some(cycle_length) = params.cycle_length {
        config.cycle_length = cycle_length;
    }
    if let Some(new_quota) = params.new_quota {
        config.new_quota = new_quota;
    }
    if params.deck_min.is_some() {
        config.deck_min = params.deck_min;
    }

    let set = StudySet::create(
        name.to_string(),
        terms,
        config,
        params.default_score.map(Score),
        Utc::now(),
        &mut rand::thread_rng(),
    )?;
    app.storage.create_set(&set)?;
    for warning in set.unconfigured_scores() {
        eprintln!("{} {}", paint("warning:", Color::YELLOW, use_color), warning);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&set.status())?);
        }
        OutputFormat::Plain => {
            println!("Created set \"{}\" with {} terms", set.name, set.terms.len());
            println!("  Scores: {}", score_counts(&set.queues.populations()));
            println!("  Cycle length: {} sessions", set.config.cycle_length);
        }
    }

    Ok(())
}
