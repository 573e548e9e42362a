// Subcommand execution.
//
// Each command returns its report as a string plus any per-row diagnostics,
// so `main` decides where they are printed.

use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use oddsapex_core::calibration::CalibrationCurve;
use oddsapex_core::report::{lay_report, lay_table_row, score_summary};
use oddsapex_core::{Bankroll, LayBook, ModelConfig, ScoreModel, ScoreResult};
use serde::Serialize;
use tracing::{error, info};

use crate::cli::{LayFormat, ScoreFormat};
use crate::metrics::{self, FieldRow};
use crate::table;

/// Rendered report and the problems found along the way.
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub report: String,
    pub diagnostics: Vec<String>,
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

/// A golfer's name and evaluation, as printed in JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredGolfer {
    pub name: String,
    #[serde(flatten)]
    pub result: ScoreResult,
    /// Model probability beats the market's implied probability.
    pub has_value: bool,
}

#[derive(Debug, Default)]
pub struct FieldScores {
    pub scored: Vec<ScoredGolfer>,
    /// One message per row that could not be evaluated.
    pub rejected: Vec<String>,
}

/// Evaluate every loaded row. Failures are collected, never fatal.
pub fn score_field(model: &ScoreModel, rows: Vec<FieldRow>) -> FieldScores {
    let mut scores = FieldScores::default();

    for FieldRow { row, outcome } in rows {
        let golfer = match outcome {
            Ok(golfer) => golfer,
            Err(e) => {
                scores.rejected.push(format!("row {row}: {e}"));
                continue;
            }
        };

        match model.evaluate(&golfer.metrics) {
            Ok(result) => scores.scored.push(ScoredGolfer {
                name: golfer.name,
                has_value: result.has_value(),
                result,
            }),
            Err(e) => {
                error!("failed to evaluate '{}' (row {}): {}", golfer.name, row, e);
                scores
                    .rejected
                    .push(format!("row {row} ({}): {e}", golfer.name));
            }
        }
    }

    scores
}

pub fn render_scores(
    scored: &[ScoredGolfer],
    format: ScoreFormat,
) -> Result<String, serde_json::Error> {
    let mut out = match format {
        ScoreFormat::Json => serde_json::to_string_pretty(scored)?,
        ScoreFormat::Summary => lines(scored, score_summary),
        ScoreFormat::Table => lines(scored, lay_table_row),
    };
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

fn lines(scored: &[ScoredGolfer], render: fn(&str, &ScoreResult) -> String) -> String {
    let mut out = String::new();
    for golfer in scored {
        let _ = writeln!(out, "{}", render(&golfer.name, &golfer.result));
    }
    out
}

pub fn run_score(
    config: &ModelConfig,
    players: &Path,
    format: ScoreFormat,
) -> anyhow::Result<CommandOutput> {
    let model = ScoreModel::new(config).context("failed to derive calibration curve")?;
    let rows = metrics::load_field(players).context("failed to load golfer metrics")?;
    let total = rows.len();

    let scores = score_field(&model, rows);
    info!(
        "Scored {} of {} golfers from {} ({} with positive edge)",
        scores.scored.len(),
        total,
        players.display(),
        scores.scored.iter().filter(|g| g.has_value).count()
    );

    let report = render_scores(&scores.scored, format).context("failed to render scores")?;
    Ok(CommandOutput {
        report,
        diagnostics: scores.rejected,
    })
}

// ---------------------------------------------------------------------------
// lay
// ---------------------------------------------------------------------------

pub fn render_lay(
    book: &LayBook,
    format: LayFormat,
    currency: &str,
) -> Result<String, serde_json::Error> {
    match format {
        LayFormat::Report => Ok(lay_report(book, currency)),
        LayFormat::Json => {
            let mut out = serde_json::to_string_pretty(book)?;
            out.push('\n');
            Ok(out)
        }
    }
}

pub fn run_lay(
    config: &ModelConfig,
    table_path: &Path,
    bankroll: &str,
    format: LayFormat,
) -> anyhow::Result<CommandOutput> {
    let bankroll = Bankroll::parse(bankroll).context("invalid bankroll")?;
    let raw = table::read_table(table_path).context("failed to read lay table")?;

    let book = table::lay_from_table(&raw, bankroll, &config.lay);
    info!(
        "Lay book: {} candidates, total stake {:.2}, total liability {:.2}",
        book.candidates.len(),
        book.total_stake(),
        book.total_liability()
    );

    let report = render_lay(&book, format, &config.output.currency_symbol)
        .context("failed to render lay book")?;
    Ok(CommandOutput {
        report,
        diagnostics: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// curve
// ---------------------------------------------------------------------------

/// Score, raw curve probability and floored probability, one row per step.
pub fn render_curve(curve: &CalibrationCurve, floor: f64, step: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "a = {:.6}  b = {:.4}  floor = {:.2}%",
        curve.a,
        curve.b,
        floor * 100.0
    );
    let _ = writeln!(out, "{:>7}  {:>9}  {:>9}", "Score", "Curve%", "Model%");
    for (score, p) in curve.table(step) {
        let _ = writeln!(
            out,
            "{:>7.1}  {:>8.3}%  {:>8.3}%",
            score,
            p * 100.0,
            p.max(floor) * 100.0
        );
    }
    out
}

pub fn run_curve(config: &ModelConfig, step: f64) -> anyhow::Result<CommandOutput> {
    let curve = CalibrationCurve::from_config(&config.calibration)
        .context("failed to derive calibration curve")?;
    Ok(CommandOutput {
        report: render_curve(&curve, config.scoring.probability_floor, step),
        diagnostics: Vec::new(),
    })
}
