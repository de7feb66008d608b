use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

/// Reset a completed cycle. With `keep` false the reset is declined and the
/// set stays blocked; parameters are only changed when the reset goes ahead.
pub fn run(
    app: &App,
    set_name: &str,
    keep: bool,
    cycle_length: Option<u32>,
    new_quota: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let mut set = app.find_set(set_name)?;
    let reset = set.reset_cycle(keep, &mut rand::thread_rng())?;
    set.set_parameters(cycle_length, new_quota)?;
    app.save(&set)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "set": set.name,
                "reset": reset,
                "cycleLength": set.config.cycle_length,
                "newQuota": set.config.new_quota,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Started cycle {} of \"{}\"", reset.cycle, set.name);
            for (score, count) in &reset.recaptured {
                let shuffled = if reset.shuffled.contains(score) { ", shuffled" } else { "" };
                println!("  Score {}: baseline {}{}", score, count, shuffled);
            }
            println!(
                "  {} sessions per cycle, {} new terms per deck",
                set.config.cycle_length, set.config.new_quota
            );
        }
    }

    Ok(())
}
