use anyhow::Result;
use chrono::Utc;

use mahir_lib::study::Session;

use crate::app::App;
use crate::render::{paint, score_color, score_counts, Color};
use crate::OutputFormat;

/// Build the next deck on a throwaway session; nothing is saved
pub fn run(app: &App, set_name: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_set(set_name)?;
    let session = Session::begin(&set, Utc::now(), &mut rand::thread_rng())?;
    let deck = session.deck();

    match format {
        OutputFormat::Json => {
            let mut terms = Vec::new();
            for id in &deck.terms {
                let term = session.term(*id)?;
                terms.push(serde_json::json!({
                    "id": id,
                    "term": term.term,
                    "definition": term.definition,
                    "score": term.score,
                }));
            }
            let output = serde_json::json!({
                "set": set.name,
                "cycle": set.cycle.cycle,
                "session": session.number(),
                "stats": deck.stats,
                "terms": terms,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} cycle {} session {}: {} terms ({})",
                paint(&set.name, Color::BOLD, use_color),
                set.cycle.cycle,
                session.number(),
                deck.len(),
                score_counts(&deck.stats)
            );
            for id in &deck.terms {
                let term = session.term(*id)?;
                println!(
                    "  {:>5} {} {}  {}",
                    id,
                    paint(&format!("[{}]", term.score), score_color(term.score), use_color),
                    term.term,
                    paint(&term.definition, Color::DIM, use_color)
                );
            }
        }
    }

    Ok(())
}
