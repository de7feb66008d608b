use std::path::Path;

use anyhow::{Context, Result};

use mahir_lib::import::load_terms;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, set_name: &str, file: &Path, format: &OutputFormat) -> Result<()> {
    let mut set = app.find_set(set_name)?;
    let terms = load_terms(file, app.config.delimiter)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let added = set.add_terms(terms)?;
    app.save(&set)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "set": set.name,
                "added": added,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added {} new terms to \"{}\"", added.len(), set.name);
            if let (Some(first), Some(last)) = (added.first(), added.last()) {
                println!("  IDs: {}..{}", first, last);
            }
        }
    }

    Ok(())
}
