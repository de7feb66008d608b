mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mahir", about = "Tiered spaced-repetition study for vocabulary sets", version)]
struct Cli {
    /// Config file (default: <config dir>/mahir/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List all study sets
    List,

    /// Create a set from a vocabulary file
    New {
        /// Name of the new set
        name: String,
        /// Delimited file: term, definition, occurrences, sources, score
        file: PathBuf,
        /// Score given to rows without one
        #[arg(long)]
        default_score: Option<u32>,
        /// Sessions per cycle
        #[arg(long)]
        cycle_length: Option<u32>,
        /// New terms per deck
        #[arg(long)]
        new_quota: Option<usize>,
        /// Legacy mode: fill decks with new terms up to this size
        #[arg(long)]
        deck_min: Option<usize>,
    },

    /// Add terms to a set as new (score 0)
    Add {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Delimited vocabulary file
        file: PathBuf,
    },

    /// Show populations, cycle progress and next quotas
    Status {
        /// Set name (case-insensitive prefix match)
        set: String,
    },

    /// Preview the next deck without starting a session
    Deck {
        /// Set name (case-insensitive prefix match)
        set: String,
    },

    /// Run a study session
    Study {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Read "id score" lines from a file instead of prompting
        #[arg(long)]
        scores: Option<PathBuf>,
    },

    /// Start the next cycle once the current one is complete
    Reset {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Decline the reset and leave the set blocked
        #[arg(long)]
        decline: bool,
        /// New cycle length
        #[arg(long)]
        cycle_length: Option<u32>,
        /// New terms per deck
        #[arg(long)]
        new_quota: Option<usize>,
    },

    /// Show past sessions
    History {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Show only the most recent sessions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Simulate decks without changing scores
    Simulate {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Sessions to simulate (default: two cycles)
        #[arg(long)]
        sessions: Option<u32>,
    },

    /// Delete terms, or a whole set
    Delete {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Term ids to delete
        #[arg(required_unless_present = "whole_set")]
        ids: Vec<u64>,
        /// Delete the set file itself
        #[arg(long, conflicts_with = "ids")]
        whole_set: bool,
    },

    /// Merge terms into the first id given
    Merge {
        /// Set name (case-insensitive prefix match)
        set: String,
        /// Term that absorbs the others
        target: u64,
        /// Terms folded into the target
        #[arg(required = true)]
        others: Vec<u64>,
    },

    /// Renumber term ids 1..N
    Reindex {
        /// Set name (case-insensitive prefix match)
        set: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::List => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Command::New { name, file, default_score, cycle_length, new_quota, deck_min } => {
            let params = commands::new::Params { default_score, cycle_length, new_quota, deck_min };
            commands::new::run(&app, &name, &file, params, &cli.format, use_color)?;
        }
        Command::Add { set, file } => {
            commands::add::run(&app, &set, &file, &cli.format)?;
        }
        Command::Status { set } => {
            commands::status::run(&app, &set, &cli.format, use_color)?;
        }
        Command::Deck { set } => {
            commands::deck::run(&app, &set, &cli.format, use_color)?;
        }
        Command::Study { set, scores } => {
            commands::study::run(&app, &set, scores.as_deref(), &cli.format, use_color)?;
        }
        Command::Reset { set, decline, cycle_length, new_quota } => {
            commands::reset::run(&app, &set, !decline, cycle_length, new_quota, &cli.format)?;
        }
        Command::History { set, limit } => {
            commands::history::run(&app, &set, limit, &cli.format)?;
        }
        Command::Simulate { set, sessions } => {
            commands::simulate::run(&app, &set, sessions, &cli.format)?;
        }
        Command::Delete { set, ids, whole_set } => {
            commands::maintenance::run_delete(&app, &set, &ids, whole_set, &cli.format)?;
        }
        Command::Merge { set, target, others } => {
            commands::maintenance::run_merge(&app, &set, target, &others, &cli.format)?;
        }
        Command::Reindex { set } => {
            commands::maintenance::run_reindex(&app, &set, &cli.format)?;
        }
    }

    Ok(())
}
