use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::study::{NewTerm, Score};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("Line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

pub type Result<T> = std::result::Result<T, ImportError>;

const TERM: usize = 0;
const DEFINITION: usize = 1;
const OCCURRENCES: usize = 2;
const SOURCES: usize = 3;
const SCORE: usize = 4;

/// Load terms from a delimited file
pub fn load_terms(path: &Path, delimiter: char) -> Result<Vec<NewTerm>> {
    let file = File::open(path)?;
    let terms = parse_terms(file, delimiter)?;
    log::info!("Read {} terms from {}", terms.len(), path.display());
    Ok(terms)
}

/// Parse rows of `term, definition[, occurrences[, sources[, score]]]`.
///
/// Lines starting with `#` are skipped, as is a leading header row whose
/// first cell is `term`. Empty optional cells are treated as absent.
pub fn parse_terms<R: Read>(reader: R, delimiter: char) -> Result<Vec<NewTerm>> {
    if !delimiter.is_ascii() {
        return Err(ImportError::InvalidDelimiter(delimiter));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .comment(Some(b'#'))
        .quoting(delimiter != '\t')
        .from_reader(reader);

    let mut terms = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);
        let cell = |i: usize| record.get(i).map(str::trim).filter(|s| !s.is_empty());

        if index == 0 && cell(TERM).is_some_and(|t| t.eq_ignore_ascii_case("term")) {
            continue;
        }
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let term = cell(TERM).ok_or_else(|| ImportError::InvalidRow {
            line,
            message: "missing term".to_string(),
        })?;
        let definition = cell(DEFINITION).ok_or_else(|| ImportError::InvalidRow {
            line,
            message: format!("missing definition for {:?}", term),
        })?;
        let score = cell(SCORE)
            .map(|s| {
                s.parse::<u32>().map(Score).map_err(|_| ImportError::InvalidRow {
                    line,
                    message: format!("invalid score {:?}", s),
                })
            })
            .transpose()?;

        terms.push(NewTerm {
            term: term.to_string(),
            definition: definition.to_string(),
            occurrences: cell(OCCURRENCES).map(str::to_string),
            sources: cell(SOURCES).map(parse_sources).unwrap_or_default(),
            score,
        });
    }

    Ok(terms)
}

/// Sources are either a JSON list of strings or a `;`-separated list
pub fn parse_sources(raw: &str) -> Vec<String> {
    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return list;
        }
        log::debug!("Sources {:?} are not a JSON list, splitting on ';'", raw);
    }
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_rows() {
        let input = "term\tdefinition\toccurrences\tsources\tscore\n\
                     שָׁלוֹם\tpeace\tGen 15:15\t[\"BDB 1022\", \"HALOT\"]\t3\n\
                     בַּיִת\thouse\t\tBDB 108; HALOT\t\n";
        let terms = parse_terms(input.as_bytes(), '\t').unwrap();

        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].term, "שָׁלוֹם");
        assert_eq!(terms[0].occurrences.as_deref(), Some("Gen 15:15"));
        assert_eq!(terms[0].sources, vec!["BDB 1022", "HALOT"]);
        assert_eq!(terms[0].score, Some(Score(3)));
        assert_eq!(terms[1].occurrences, None);
        assert_eq!(terms[1].sources, vec!["BDB 108", "HALOT"]);
        assert_eq!(terms[1].score, None);
    }

    #[test]
    fn test_short_rows_and_comments() {
        let input = "# chapter 1\nqalb\theart\n\nnafs\tsoul\t\t\t1\n";
        let terms = parse_terms(input.as_bytes(), '\t').unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].definition, "heart");
        assert_eq!(terms[0].score, None);
        assert_eq!(terms[1].score, Some(Score(1)));
    }

    #[test]
    fn test_quotes_are_literal_in_tab_files() {
        let input = "\"ayn\"\teye; spring\n";
        let terms = parse_terms(input.as_bytes(), '\t').unwrap();
        assert_eq!(terms[0].term, "\"ayn\"");
        assert_eq!(terms[0].definition, "eye; spring");
    }

    #[test]
    fn test_comma_delimited() {
        let input = "kitab,\"book, writing\",,,2\n";
        let terms = parse_terms(input.as_bytes(), ',').unwrap();
        assert_eq!(terms[0].definition, "book, writing");
        assert_eq!(terms[0].score, Some(Score(2)));
    }

    #[test]
    fn test_invalid_rows() {
        let missing = parse_terms("lonely\n".as_bytes(), '\t');
        assert!(matches!(missing, Err(ImportError::InvalidRow { line: 1, .. })));

        let bad_score = parse_terms("a\tb\t\t\tthree\n".as_bytes(), '\t');
        assert!(matches!(bad_score, Err(ImportError::InvalidRow { .. })));

        assert!(matches!(parse_terms("".as_bytes(), 'ש'), Err(ImportError::InvalidDelimiter('ש'))));
    }

    #[test]
    fn test_load_terms_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("words.tsv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "ruh\tspirit\t\tLane").unwrap();

        let terms = load_terms(&path, '\t').unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].sources, vec!["Lane"]);
    }
}
