use std::collections::HashSet;

use anyhow::{bail, Result};

use mahir_lib::study::TermId;

use crate::app::App;
use crate::OutputFormat;

pub fn run_delete(app: &App, set_name: &str, ids: &[u64], whole_set: bool, format: &OutputFormat) -> Result<()> {
    let mut set = app.find_set(set_name)?;

    if whole_set {
        app.storage.delete_set(&set.name)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": set.name })),
            OutputFormat::Plain => println!("Deleted set \"{}\"", set.name),
        }
        return Ok(());
    }

    // Check every id before removing any
    let mut distinct = HashSet::with_capacity(ids.len());
    for id in ids {
        if !distinct.insert(*id) {
            bail!("Term {} is listed more than once", id);
        }
        set.terms.get(TermId(*id))?;
    }
    let mut removed = Vec::new();
    for id in ids {
        removed.push(set.delete_term(TermId(*id))?);
    }
    app.save(&set)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
        OutputFormat::Plain => {
            for (id, term) in ids.iter().zip(&removed) {
                println!("Deleted {} {}", id, term.term);
            }
        }
    }

    Ok(())
}

pub fn run_merge(app: &App, set_name: &str, target: u64, others: &[u64], format: &OutputFormat) -> Result<()> {
    let mut set = app.find_set(set_name)?;
    let others: Vec<TermId> = others.iter().copied().map(TermId).collect();
    let merged = set.merge_terms(TermId(target), &others)?.clone();
    app.save(&set)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        OutputFormat::Plain => {
            println!("Merged {} terms into {}", others.len(), target);
            println!("  {}  {}", merged.term, merged.definition);
        }
    }

    Ok(())
}

pub fn run_reindex(app: &App, set_name: &str, format: &OutputFormat) -> Result<()> {
    let mut set = app.find_set(set_name)?;
    let mapping = set.reindex();
    app.save(&set)?;

    let moved: Vec<(TermId, TermId)> = mapping.into_iter().filter(|(old, new)| old != new).collect();
    match format {
        OutputFormat::Json => {
            let output: Vec<_> = moved
                .iter()
                .map(|(old, new)| serde_json::json!({ "old": old, "new": new }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Reindexed \"{}\": {} ids changed", set.name, moved.len());
            for (old, new) in &moved {
                println!("  {} -> {}", old, new);
            }
        }
    }

    Ok(())
}
