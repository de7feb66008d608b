//! Vocabulary import from delimited text files

mod tsv;

pub use tsv::{load_terms, parse_sources, parse_terms, ImportError};
