use anyhow::Result;

use mahir_lib::study::CycleStatus;

use crate::app::App;
use crate::render::{paint, score_color, Color};
use crate::OutputFormat;

pub fn run(app: &App, set_name: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_set(set_name)?;
    let status = set.status();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&status.name, Color::BOLD, use_color));
            println!("  Terms: {} ({} known, {} new)", status.terms, status.learned, status.unlearned);
            println!(
                "  Cycle {}: {}/{} sessions",
                status.cycle, status.sessions, status.cycle_length
            );
            if status.cycle_status == CycleStatus::Complete {
                println!(
                    "  {}",
                    paint("Cycle complete; run `mahir reset` to start the next one", Color::YELLOW, use_color)
                );
            }

            println!("  {:>5} {:>7} {:>6}", "score", "terms", "next");
            for (score, population) in &status.populations {
                let next = status
                    .next_quotas
                    .get(score)
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {} {:>7} {:>6}",
                    paint(&format!("{:>5}", score), score_color(*score), use_color),
                    population,
                    next
                );
            }
            if !status.next_quotas.is_empty() {
                println!("  Next deck: {} terms", status.next_quotas.values().sum::<usize>());
            }
            println!("  Sessions recorded: {}", status.sessions_recorded);
        }
    }

    Ok(())
}
