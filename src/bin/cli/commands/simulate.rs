use anyhow::Result;

use mahir_lib::study::simulate;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, set_name: &str, sessions: Option<u32>, format: &OutputFormat) -> Result<()> {
    let set = app.find_set(set_name)?;
    let sessions = sessions.unwrap_or(set.config.cycle_length.saturating_mul(2));
    let report = simulate(&set, sessions, &mut rand::thread_rng())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            let total: usize = report.deck_sizes.iter().sum();
            let (min, max) = (
                report.deck_sizes.iter().min().copied().unwrap_or(0),
                report.deck_sizes.iter().max().copied().unwrap_or(0),
            );
            println!(
                "Simulated {} sessions of \"{}\" ({} cycle resets)",
                report.sessions, set.name, report.cycles_started
            );
            if report.sessions > 0 {
                println!(
                    "  Deck size: avg {:.1}, min {}, max {}",
                    total as f64 / f64::from(report.sessions),
                    min,
                    max
                );
            }
            println!("  {:>5} {:>7} {:>7} {:>9}", "score", "terms", "draws", "per term");
            for (score, occurrence) in &report.per_score {
                println!(
                    "  {:>5} {:>7} {:>7} {:>9.2}",
                    score,
                    occurrence.terms,
                    occurrence.draws,
                    occurrence.average()
                );
            }
        }
    }

    Ok(())
}
