// Golfer metrics CSV loading.
//
// One row per golfer, one column per metric. Cells are read as text and
// converted here so a bad cell names its column. Rows are independent: a row
// that fails to convert is returned as an error alongside the good ones.

use std::io::Read;
use std::path::Path;

use oddsapex_core::PlayerMetrics;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named golfer and their metric snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Golfer {
    pub name: String,
    pub metrics: PlayerMetrics,
}

/// One data row of the field file, numbered from 1 (header excluded).
#[derive(Debug)]
pub struct FieldRow {
    pub row: usize,
    pub outcome: Result<Golfer, MetricsError>,
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("malformed row: {0}")]
    Record(#[source] csv::Error),

    #[error("column `{field}` is not a number: `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("golfer name is empty")]
    MissingName,
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// Metrics file row. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawGolferRow {
    name: String,
    xwins: String,
    total_shots_gained: String,
    putt: String,
    tee_to_green: String,
    sg_true: String,
    sg_expected: String,
    course_fit: String,
    ranking: String,
    live_odds: String,
    leaderboard_position: String,
    shots_behind: String,
    last_finishes: String,
    sg_off_tee: String,
    sg_approach: String,
    sg_putting: String,
    scrambling: String,
}

impl RawGolferRow {
    fn into_golfer(self) -> Result<Golfer, MetricsError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(MetricsError::MissingName);
        }

        let metrics = PlayerMetrics {
            expected_wins: number("xwins", &self.xwins)?,
            total_shots_gained: number("total_shots_gained", &self.total_shots_gained)?,
            putt: number("putt", &self.putt)?,
            tee_to_green: number("tee_to_green", &self.tee_to_green)?,
            sg_true: number("sg_true", &self.sg_true)?,
            sg_expected: number("sg_expected", &self.sg_expected)?,
            course_fit: number("course_fit", &self.course_fit)?,
            ranking: number("ranking", &self.ranking)?,
            live_odds: number("live_odds", &self.live_odds)?,
            leaderboard_position: number("leaderboard_position", &self.leaderboard_position)?,
            shots_behind: number("shots_behind", &self.shots_behind)?,
            last_finishes: parse_finishes(&self.last_finishes)?,
            sg_off_tee: number("sg_off_tee", &self.sg_off_tee)?,
            sg_approach: number("sg_approach", &self.sg_approach)?,
            sg_putting: number("sg_putting", &self.sg_putting)?,
            scrambling: number("scrambling", &self.scrambling)?,
        };

        Ok(Golfer { name, metrics })
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse one numeric cell. `inf` and `NaN` are not accepted.
fn number(field: &'static str, text: &str) -> Result<f64, MetricsError> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MetricsError::InvalidNumber {
            field,
            value: text.to_string(),
        })
}

/// Split a recent-finishes cell such as `"5 18 2 30 9"` or `"5;18;2"`.
///
/// Whitespace, `;`, `/` and `,` all separate values. The count is checked by
/// the score model, not here.
pub fn parse_finishes(text: &str) -> Result<Vec<f64>, MetricsError> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ';' | '/' | ','))
        .filter(|piece| !piece.is_empty())
        .map(|piece| number("last_finishes", piece))
        .collect()
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_field_from_reader<R: Read>(rdr: R) -> Result<Vec<FieldRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    reader.headers()?;

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<RawGolferRow>().enumerate() {
        let row = index + 1;
        let outcome = result
            .map_err(MetricsError::Record)
            .and_then(RawGolferRow::into_golfer);
        if let Err(e) = &outcome {
            warn!("skipping golfer row {}: {}", row, e);
        }
        rows.push(FieldRow { row, outcome });
    }
    Ok(rows)
}

/// Load every row of a golfer metrics CSV.
pub fn load_field(path: &Path) -> Result<Vec<FieldRow>, MetricsError> {
    let file = std::fs::File::open(path).map_err(|e| MetricsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_field_from_reader(file).map_err(|e| MetricsError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,xwins,total_shots_gained,putt,tee_to_green,sg_true,sg_expected,\
course_fit,ranking,live_odds,leaderboard_position,shots_behind,last_finishes,sg_off_tee,\
sg_approach,sg_putting,scrambling";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    fn load(text: &str) -> Vec<FieldRow> {
        load_field_from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn parses_complete_row() {
        let rows = load(&csv_with(&[
            "Rory McIlroy,1.4,2.1,0.6,1.5,1.8,1.3,0.8,12,14.0,4,2,5 18 2 30 9,0.4,0.9,0.3,61",
        ]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 1);
        let golfer = rows[0].outcome.as_ref().unwrap();
        assert_eq!(golfer.name, "Rory McIlroy");
        assert_eq!(golfer.metrics.expected_wins, 1.4);
        assert_eq!(golfer.metrics.live_odds, 14.0);
        assert_eq!(golfer.metrics.last_finishes, vec![5.0, 18.0, 2.0, 30.0, 9.0]);
        assert_eq!(golfer.metrics.scrambling, 61.0);
    }

    #[test]
    fn bad_cell_names_its_column() {
        let rows = load(&csv_with(&[
            "Bad Putter,1.4,2.1,abc,1.5,1.8,1.3,0.8,12,14.0,4,2,5 18 2 30 9,0.4,0.9,0.3,61",
        ]));
        match rows[0].outcome.as_ref().unwrap_err() {
            MetricsError::InvalidNumber { field, value } => {
                assert_eq!(*field, "putt");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidNumber, got: {other}"),
        }
    }

    #[test]
    fn empty_cell_is_rejected() {
        let rows = load(&csv_with(&[
            "No Odds,1.4,2.1,0.6,1.5,1.8,1.3,0.8,12,,4,2,5 18 2 30 9,0.4,0.9,0.3,61",
        ]));
        assert!(matches!(
            rows[0].outcome,
            Err(MetricsError::InvalidNumber { field: "live_odds", .. })
        ));
    }

    #[test]
    fn bad_row_does_not_affect_others() {
        let rows = load(&csv_with(&[
            "Good One,1.4,2.1,0.6,1.5,1.8,1.3,0.8,12,14.0,4,2,5 18 2 30 9,0.4,0.9,0.3,61",
            "Broken,1.4,2.1,0.6,1.5,1.8,1.3,0.8,12,NaN,4,2,5 18 2 30 9,0.4,0.9,0.3,61",
            "Good Two,0.5,1.0,0.1,0.9,0.7,0.6,0.2,40,40.0,15,5,20;25;12;40;33,0.1,0.4,0.2,55",
        ]));
        assert_eq!(rows.len(), 3);
        assert!(rows[0].outcome.is_ok());
        assert!(rows[1].outcome.is_err());
        assert_eq!(rows[1].row, 2);
        let second = rows[2].outcome.as_ref().unwrap();
        assert_eq!(second.metrics.last_finishes, vec![20.0, 25.0, 12.0, 40.0, 33.0]);
    }

    #[test]
    fn short_row_is_malformed() {
        let rows = load(&csv_with(&["Short,1.4,2.1"]));
        assert!(matches!(rows[0].outcome, Err(MetricsError::Record(_))));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let text = format!(
            "{HEADER},notes\n\
             Extra Col,1.4,2.1,0.6,1.5,1.8,1.3,0.8,12,14.0,4,2,5 18 2 30 9,0.4,0.9,0.3,61,hot putter\n"
        );
        let rows = load(&text);
        assert_eq!(rows[0].outcome.as_ref().unwrap().name, "Extra Col");
    }

    #[test]
    fn blank_name_is_rejected() {
        let rows = load(&csv_with(&[
            " ,1.4,2.1,0.6,1.5,1.8,1.3,0.8,12,14.0,4,2,5 18 2 30 9,0.4,0.9,0.3,61",
        ]));
        assert!(matches!(rows[0].outcome, Err(MetricsError::MissingName)));
    }

    #[test]
    fn finishes_accept_mixed_separators() {
        assert_eq!(
            parse_finishes("1/2; 3  4,5").unwrap(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0]
        );
        assert!(parse_finishes("").unwrap().is_empty());
        assert!(matches!(
            parse_finishes("1 2 x"),
            Err(MetricsError::InvalidNumber { field: "last_finishes", .. })
        ));
    }

    #[test]
    fn empty_file_has_no_rows() {
        assert!(load("").is_empty());
        assert!(load(&csv_with(&[])).is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_field(Path::new("/nonexistent/field.csv")).unwrap_err();
        assert!(matches!(err, MetricsError::Io { .. }));
    }
}
