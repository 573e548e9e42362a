// Pipe-delimited lay table parsing.
//
// Input is free text, one golfer per line: `name | score | odds`. Lines
// without a `|` are commentary and ignored. Lines with fewer than three
// fields, or whose score or odds are not numbers, are skipped.

use std::io::Read;
use std::path::Path;

use oddsapex_core::config::LayConfig;
use oddsapex_core::{build_lay_list, Bankroll, LayBook, LayRow};
use thiserror::Error;
use tracing::debug;

pub const FIELD_SEPARATOR: char = '|';

/// Path argument meaning "read standard input".
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),
}

/// Read the raw table text from a file, or from stdin when `path` is `-`.
pub fn read_table(path: &Path) -> Result<String, InputError> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(InputError::Stdin)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse one line. Extra fields after the odds are ignored.
pub fn parse_line(line: &str) -> Option<LayRow> {
    if !line.contains(FIELD_SEPARATOR) {
        return None;
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < 3 {
        debug!("skipping table line with {} fields: {:?}", fields.len(), line);
        return None;
    }

    let (score, odds) = match (parse_number(fields[1]), parse_number(fields[2])) {
        (Some(score), Some(odds)) => (score, odds),
        _ => {
            debug!("skipping table line with unparsable numbers: {:?}", line);
            return None;
        }
    };

    Some(LayRow::new(fields[0], score, odds))
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse every data row of a lay table, in input order.
pub fn parse_lay_rows(text: &str) -> Vec<LayRow> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse the table and build the lay book. The bankroll is validated when
/// the [`Bankroll`] is built, so callers reject a bad one before any table
/// text is read.
pub fn lay_from_table(raw: &str, bankroll: Bankroll, config: &LayConfig) -> LayBook {
    let rows = parse_lay_rows(raw);
    let book = build_lay_list(&rows, bankroll, config);
    debug!(
        "lay table: {} rows parsed, {} candidates",
        rows.len(),
        book.candidates.len()
    );
    book
}
