use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::study::{CycleStatus, StudyError, StudySet};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Set not found: {0}")]
    NotFound(String),

    #[error("Set already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid set name: {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    InvalidSet(#[from] StudyError),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Lightweight listing entry for a stored set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub name: String,
    pub terms: usize,
    pub cycle: u32,
    pub sessions: u32,
    pub cycle_status: CycleStatus,
}

/// Storage for study sets (one JSON file per set)
pub struct SetStorage {
    sets_dir: PathBuf,
}

impl SetStorage {
    /// Create a new set storage, creating the directory if needed
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let sets_dir = data_dir.join("sets");
        fs::create_dir_all(&sets_dir)?;
        Ok(Self { sets_dir })
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("mahir"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn sets_dir(&self) -> &Path {
        &self.sets_dir
    }

    /// Get the file path for a set
    pub fn set_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.trim().is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains(char::is_control);
        if !valid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.sets_dir.join(format!("{}.json", name)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.set_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Load and validate a set by name
    pub fn load_set(&self, name: &str) -> Result<StudySet> {
        let path = self.set_path(name)?;
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Self::load_from_path(&path)
    }

    /// Load and validate a set file
    pub fn load_from_path(path: &Path) -> Result<StudySet> {
        let content = fs::read_to_string(path)?;
        let set: StudySet = serde_json::from_str(&content)?;
        set.validate()?;
        Ok(set)
    }

    /// Save a set using atomic write (write to .tmp then rename).
    ///
    /// The set is written as a whole, so a failed write leaves the previous
    /// file intact.
    pub fn save_set(&self, set: &StudySet) -> Result<()> {
        let path = self.set_path(&set.name)?;
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(set)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        log::info!("Saved set '{}' to {}", set.name, path.display());
        Ok(())
    }

    /// Save a set that must not exist yet
    pub fn create_set(&self, set: &StudySet) -> Result<()> {
        if self.exists(&set.name) {
            return Err(StorageError::AlreadyExists(set.name.clone()));
        }
        self.save_set(set)
    }

    /// Names of all stored sets, sorted
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if !self.sets_dir.exists() {
            return Ok(names);
        }

        for entry in fs::read_dir(&self.sets_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// List all readable sets as summaries. Unreadable files are skipped
    /// with a warning.
    pub fn list_sets(&self) -> Result<Vec<SetSummary>> {
        let mut summaries = Vec::new();
        for name in self.list_names()? {
            match self.load_set(&name) {
                Ok(set) => summaries.push(SetSummary {
                    terms: set.terms.len(),
                    cycle: set.cycle.cycle,
                    sessions: set.cycle.sessions,
                    cycle_status: set.cycle_status(),
                    name: set.name,
                }),
                Err(e) => log::warn!("Skipping set '{}': {}", name, e),
            }
        }
        Ok(summaries)
    }

    /// Delete a set by name
    pub fn delete_set(&self, name: &str) -> Result<()> {
        let path = self.set_path(name)?;
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        log::info!("Deleted set '{}'", name);
        Ok(())
    }
}
