use anyhow::Result;
use chrono::Local;

use crate::app::App;
use crate::render::{duration, score_counts};
use crate::OutputFormat;

pub fn run(app: &App, set_name: &str, limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let set = app.find_set(set_name)?;
    let skip = limit.map_or(0, |l| set.history.len().saturating_sub(l));
    let records = &set.history[skip..];

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("(no sessions recorded for \"{}\")", set.name);
            }
            for record in records {
                let changes: usize = record.changes.values().sum();
                println!(
                    "{}  cycle {:>3} session {:>3}  {:>7}  {} terms, {} changes, {} known, {} new",
                    record.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    record.cycle,
                    record.session,
                    duration(record.duration()),
                    record.deck.values().sum::<usize>(),
                    changes,
                    record.learned(),
                    record.unlearned()
                );
                if !record.deck.is_empty() {
                    println!("    deck {}", score_counts(&record.deck));
                }
            }
        }
    }

    Ok(())
}
