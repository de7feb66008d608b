use std::path::Path;

use anyhow::{bail, Context, Result};

use mahir_lib::config::AppConfig;
use mahir_lib::storage::SetStorage;
use mahir_lib::study::StudySet;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub storage: SetStorage,
}

impl App {
    /// Load the config file and open the set storage it points at
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_path().context("Failed to get config directory")?,
        };
        let config = AppConfig::load(&config_path)?;

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let storage = SetStorage::new(data_dir.clone())
            .with_context(|| format!("Failed to initialize storage in {}", data_dir.display()))?;

        Ok(Self { config, storage })
    }

    /// Find a set by name (case-insensitive, exact match first, then prefix)
    pub fn find_set(&self, name: &str) -> Result<StudySet> {
        let names = self.storage.list_names().context("Failed to list sets")?;
        let name_lower = name.to_lowercase();

        if let Some(found) = names.iter().find(|n| n.to_lowercase() == name_lower) {
            return self.load(found);
        }

        let matches: Vec<&String> = names
            .iter()
            .filter(|n| n.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No set matching '{}'. Available sets:\n{}",
                name,
                names.iter().map(|n| format!("  - {}", n)).collect::<Vec<_>>().join("\n")
            ),
            1 => self.load(matches[0]),
            _ => bail!(
                "Ambiguous set name '{}'. Matches:\n{}",
                name,
                matches.iter().map(|n| format!("  - {}", n)).collect::<Vec<_>>().join("\n")
            ),
        }
    }

    fn load(&self, name: &str) -> Result<StudySet> {
        self.storage
            .load_set(name)
            .with_context(|| format!("Failed to load set '{}'", name))
    }

    pub fn save(&self, set: &StudySet) -> Result<()> {
        self.storage
            .save_set(set)
            .with_context(|| format!("Failed to save set '{}'", set.name))
    }
}
