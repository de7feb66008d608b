use anyhow::{Context, Result};

use mahir_lib::study::CycleStatus;

use crate::app::App;
use crate::render::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let sets = app.storage.list_sets().context("Failed to list sets")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sets)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("(no sets in {})", app.storage.sets_dir().display());
            }
            for set in &sets {
                let blocked = match set.cycle_status {
                    CycleStatus::Complete => paint(" [awaiting reset]", Color::YELLOW, use_color),
                    CycleStatus::Active => String::new(),
                };
                println!(
                    "{} ({} terms, cycle {} session {}){}",
                    paint(&set.name, Color::BOLD, use_color),
                    set.terms,
                    set.cycle,
                    set.sessions,
                    blocked
                );
            }
        }
    }

    Ok(())
}
