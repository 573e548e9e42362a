// Lay candidate selection and fractional-Kelly stake sizing.
//
// Takes pre-scored rows (name, percentage score, decimal odds), keeps the
// ones where laying has positive expected value, sizes each with a fraction
// of the Kelly stake, and ranks them by lay EV.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::LayConfig;
use crate::odds;
use crate::probability::{ScorePercentage, WinProbability};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayError {
    #[error("bankroll must be a positive number, got {0}")]
    InvalidBankroll(f64),

    #[error("bankroll must be a positive number, got `{0}`")]
    UnparsableBankroll(String),
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One data row of a lay table.
#[derive(Debug, Clone, PartialEq)]
pub struct LayRow {
    pub name: String,
    /// Win chance as a percentage (8.0 means 8%).
    pub score: f64,
    pub odds: f64,
}

impl LayRow {
    pub fn new(name: impl Into<String>, score: f64, odds: f64) -> Self {
        Self {
            name: name.into(),
            score,
            odds,
        }
    }
}

/// Account balance to size stakes against. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bankroll(f64);

impl Bankroll {
    pub fn new(amount: f64) -> Result<Self, LayError> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(LayError::InvalidBankroll(amount))
        }
    }

    /// Parse a bankroll typed as text, e.g. `"250"` or `" 99.50 "`.
    pub fn parse(text: &str) -> Result<Self, LayError> {
        let amount: f64 = text
            .trim()
            .parse()
            .map_err(|_| LayError::UnparsableBankroll(text.trim().to_string()))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A lay worth placing, with its recommended size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayCandidate {
    pub name: String,
    pub odds: f64,
    pub probability: f64,
    /// Expected profit per unit of backer's stake laid.
    pub lay_ev: f64,
    /// Backer's stake to accept.
    pub stake: f64,
    /// Amount lost if the selection wins: `stake * (odds - 1)`.
    pub liability: f64,
}

/// Ranked lay candidates for one bankroll. An empty list is a valid result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayBook {
    pub bankroll: Bankroll,
    pub kelly_fraction: f64,
    pub candidates: Vec<LayCandidate>,
}

impl LayBook {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn total_stake(&self) -> f64 {
        self.candidates.iter().map(|c| c.stake).sum()
    }

    pub fn total_liability(&self) -> f64 {
        self.candidates.iter().map(|c| c.liability).sum()
    }
}

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Full Kelly fraction for a lay: `lay_ev / (odds - 1)`.
pub fn lay_kelly_fraction(lay_ev: f64, odds: f64) -> f64 {
    lay_ev / (odds - 1.0)
}

/// Size one row. Returns `None` for rows that cannot or should not be laid.
fn size_row<P: WinProbability>(
    row: &LayRow,
    policy: &P,
    bankroll: Bankroll,
    config: &LayConfig,
) -> Option<LayCandidate> {
    if !row.score.is_finite() || !row.odds.is_finite() {
        debug!(
            name = %row.name,
            score = row.score,
            odds = row.odds,
            "skipping row: non-finite input"
        );
        return None;
    }

    if row.odds <= 1.0 {
        debug!(name = %row.name, odds = row.odds, "skipping row: odds at or below evens");
        return None;
    }

    let probability = policy.win_probability(row.score);
    let lay_ev = odds::lay_ev(probability, row.odds);
    if lay_ev <= 0.0 {
        debug!(name = %row.name, lay_ev, "skipping row: no lay edge");
        return None;
    }

    let fraction = lay_kelly_fraction(lay_ev, row.odds).max(0.0) * config.kelly_fraction;
    let stake = fraction * bankroll.amount();
    let liability = stake * (row.odds - 1.0);

    Some(LayCandidate {
        name: row.name.clone(),
        odds: row.odds,
        probability,
        lay_ev,
        stake,
        liability,
    })
}

/// Build the ranked lay list.
///
/// Rows with odds at or below 1.0 and rows with non-positive lay EV are
/// dropped. Survivors are sorted by lay EV, best first; equal EVs keep
/// their input order.
pub fn build_lay_list(rows: &[LayRow], bankroll: Bankroll, config: &LayConfig) -> LayBook {
    let policy = ScorePercentage;
    let mut candidates: Vec<LayCandidate> = rows
        .iter()
        .filter_map(|row| size_row(row, &policy, bankroll, config))
        .collect();

    candidates.sort_by(|a, b| {
        b.lay_ev
            .partial_cmp(&a.lay_ev)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        rows = rows.len(),
        candidates = candidates.len(),
        "built lay list"
    );

    LayBook {
        bankroll,
        kelly_fraction: config.kelly_fraction,
        candidates,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
