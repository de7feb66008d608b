use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use mahir_lib::study::{Score, Session, SessionOutcome, TermId};

use crate::app::App;
use crate::render::{duration, paint, score_color, score_counts, Color};
use crate::OutputFormat;

/// A reply typed at the score prompt
#[derive(Debug, PartialEq)]
enum Answer {
    Keep,
    Rescore(Score),
    Quit,
    Invalid,
}

fn parse_answer(line: &str) -> Answer {
    let line = line.trim();
    if line.is_empty() {
        return Answer::Keep;
    }
    if line.eq_ignore_ascii_case("q") {
        return Answer::Quit;
    }
    match line.parse::<u32>() {
        Ok(score) => Answer::Rescore(Score(score)),
        Err(_) => Answer::Invalid,
    }
}

/// Parse `id score` lines. Blank lines and `#` comments are skipped.
fn parse_score_lines(text: &str) -> Result<Vec<(TermId, Score)>> {
    let mut edits = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(id), Some(score), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("Line {}: expected \"<id> <score>\", got {:?}", i + 1, line);
        };
        let id = id
            .parse::<u64>()
            .with_context(|| format!("Line {}: invalid term id {:?}", i + 1, id))?;
        let score = score
            .parse::<u32>()
            .with_context(|| format!("Line {}: invalid score {:?}", i + 1, score))?;
        edits.push((TermId(id), Score(score)));
    }
    Ok(edits)
}

fn apply_score_file(session: &mut Session, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    for (id, score) in parse_score_lines(&text)? {
        session.record_score(id, score)?;
    }
    Ok(())
}

/// Walk the deck, reading one answer per card from `input`. Returns false
/// when the user quits or the input ends before every card is answered.
fn prompt_scores<I: BufRead, W: Write>(
    session: &mut Session,
    input: I,
    out: &mut W,
    use_color: bool,
) -> Result<bool> {
    let ids = session.deck().terms.clone();
    let total = ids.len();
    let mut lines = input.lines();

    for (i, id) in ids.into_iter().enumerate() {
        let term = session.term(id)?;
        let current = term.score;
        writeln!(
            out,
            "[{}/{}] {}  {}",
            i + 1,
            total,
            paint(&term.term, Color::BOLD, use_color),
            paint(&format!("({})", current), score_color(current), use_color)
        )?;
        writeln!(out, "       {}", paint(&term.definition, Color::DIM, use_color))?;
        if let Some(occurrences) = &term.occurrences {
            writeln!(out, "       {}", paint(occurrences, Color::CYAN, use_color))?;
        }

        loop {
            write!(out, "score [{}], q to quit: ", current)?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                writeln!(out, "Input ended after {} of {} cards", i, total)?;
                return Ok(false);
            };
            match parse_answer(&line?) {
                Answer::Keep => break,
                Answer::Rescore(score) => {
                    session.record_score(id, score)?;
                    break;
                }
                Answer::Quit => return Ok(false),
                Answer::Invalid => writeln!(out, "enter a score number, nothing to keep, or q")?,
            }
        }
    }

    Ok(true)
}

/// Run one session and save it if it completes. Prompts read from `input`
/// unless a score file is given. Returns `None` for an abandoned session,
/// which leaves the stored set as it was.
fn study<I: BufRead, W: Write>(
    app: &App,
    set_name: &str,
    scores_file: Option<&Path>,
    input: I,
    out: &mut W,
    use_color: bool,
) -> Result<Option<SessionOutcome>> {
    let set = app.find_set(set_name)?;
    let mut session = Session::begin(&set, Utc::now(), &mut rand::thread_rng())?;

    let completed = match scores_file {
        Some(path) => {
            apply_score_file(&mut session, path)?;
            true
        }
        None => prompt_scores(&mut session, input, out, use_color)?,
    };
    if !completed {
        writeln!(out, "Session abandoned; \"{}\" is unchanged", session.set_name())?;
        return Ok(None);
    }

    let outcome = session.finish(Utc::now())?;
    app.save(&outcome.set)?;
    Ok(Some(outcome))
}

pub fn run(
    app: &App,
    set_name: &str,
    scores_file: Option<&Path>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let Some(outcome) = study(app, set_name, scores_file, stdin.lock(), &mut io::stderr(), use_color)? else {
        return Ok(());
    };
    for warning in &outcome.warnings {
        eprintln!("{} {}", paint("warning:", Color::YELLOW, use_color), warning);
    }

    let record = &outcome.record;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Plain => {
            println!(
                "Finished session {} of cycle {} in {}",
                record.session,
                record.cycle,
                duration(record.duration())
            );
            println!("  Deck: {}", score_counts(&record.deck));
            if record.changes.is_empty() {
                println!("  No score changes");
            } else {
                let changes: Vec<String> = record
                    .changes
                    .iter()
                    .map(|(change, count)| format!("{} x{}", change, count))
                    .collect();
                println!("  Changes: {}", changes.join(", "));
            }
            println!("  Known: {}  New: {}", record.learned(), record.unlearned());
            if outcome.set.cycle.sessions >= outcome.set.config.cycle_length {
                println!(
                    "  {}",
                    paint("Cycle complete; run `mahir reset` before the next session", Color::YELLOW, use_color)
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mahir_lib::study::{NewTerm, StudySet, TierConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, format!("data_dir = {:?}\n", temp_dir.path().join("data"))).unwrap();
        let app = App::new(Some(&config_path)).unwrap();

        let mut rng = StdRng::seed_from_u64(71);
        let terms = (0..8)
            .map(|i| NewTerm {
                term: format!("kalima {}", i),
                definition: format!("word {}", i),
                score: Some(Score(i % 3)),
                ..Default::default()
            })
            .collect();
        let set = StudySet::create("words".into(), terms, TierConfig::default(), None, Utc::now(), &mut rng).unwrap();
        app.save(&set).unwrap();
        (app, temp_dir)
    }

    #[test]
    fn test_input_ending_early_abandons_session() {
        let (app, _temp) = create_test_app();
        let before = app.find_set("words").unwrap();

        let mut out = Vec::new();
        let outcome = study(&app, "words", None, "".as_bytes(), &mut out, false).unwrap();

        assert!(outcome.is_none());
        assert_eq!(app.find_set("words").unwrap(), before);
        assert!(String::from_utf8(out).unwrap().contains("abandoned"));
    }

    #[test]
    fn test_quit_abandons_session() {
        let (app, _temp) = create_test_app();
        let before = app.find_set("words").unwrap();

        let mut out = Vec::new();
        let outcome = study(&app, "words", None, "2\nq\n".as_bytes(), &mut out, false).unwrap();

        assert!(outcome.is_none());
        assert_eq!(app.find_set("words").unwrap(), before);
    }

    #[test]
    fn test_answering_every_card_saves_session() {
        let (app, _temp) = create_test_app();
        let answers = "\n".repeat(64);

        let mut out = Vec::new();
        let outcome = study(&app, "words", None, answers.as_bytes(), &mut out, false)
            .unwrap()
            .unwrap();

        let stored = app.find_set("words").unwrap();
        assert_eq!(stored, outcome.set);
        assert_eq!(stored.cycle.sessions, 1);
        assert_eq!(stored.history.len(), 1);
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer(""), Answer::Keep);
        assert_eq!(parse_answer("  \n"), Answer::Keep);
        assert_eq!(parse_answer("3"), Answer::Rescore(Score(3)));
        assert_eq!(parse_answer("Q"), Answer::Quit);
        assert_eq!(parse_answer("-1"), Answer::Invalid);
        assert_eq!(parse_answer("three"), Answer::Invalid);
    }

    #[test]
    fn test_parse_score_lines() {
        let edits = parse_score_lines("# after chapter 2\n12\t3\n\n4 0\n").unwrap();
        assert_eq!(edits, vec![(TermId(12), Score(3)), (TermId(4), Score(0))]);

        assert!(parse_score_lines("12\n").is_err());
        assert!(parse_score_lines("12 3 4\n").is_err());
        assert!(parse_score_lines("x 3\n").is_err());
    }
}
