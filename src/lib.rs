//! Mahir: a tiered spaced-repetition scheduler for vocabulary study sets

pub mod config;
pub mod import;
pub mod storage;
pub mod study;

pub use config::{AppConfig, ConfigError};
pub use storage::{SetStorage, StorageError};
