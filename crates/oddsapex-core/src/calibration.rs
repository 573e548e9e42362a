// Logistic calibration: maps a bounded heuristic score to a win probability.
//
// The curve `P(s) = 1 / (1 + e^(-a (s - b)))` is pinned by two
// (score, probability) anchors. Working in log-odds space the curve is a
// straight line, so the two anchors determine slope `a` and midpoint `b`
// directly.

use serde::Serialize;
use thiserror::Error;

use crate::config::{Anchor, CalibrationConfig};

/// Sampling interval used by [`CalibrationCurve::table`] for invalid steps.
pub const DEFAULT_TABLE_STEP: f64 = 10.0;

/// Finest sampling interval [`CalibrationCurve::table`] will use.
pub const MIN_TABLE_STEP: f64 = 0.01;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("anchor probability must lie strictly between 0 and 1, got {probability} at score {score}")]
    ProbabilityOutOfRange { score: f64, probability: f64 },

    #[error("anchor scores must differ, both are {score}")]
    DuplicateScore { score: f64 },

    #[error("anchor values must be finite, got score {score} probability {probability}")]
    NonFinite { score: f64, probability: f64 },
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Fitted logistic curve. Immutable once derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationCurve {
    /// Slope in log-odds per score point.
    pub a: f64,
    /// Score at which the curve crosses 50%.
    pub b: f64,
}

/// Log-odds of a probability: `ln(p / (1 - p))`.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

fn check_anchor(anchor: &Anchor) -> Result<(), CalibrationError> {
    if !anchor.score.is_finite() || !anchor.probability.is_finite() {
        return Err(CalibrationError::NonFinite {
            score: anchor.score,
            probability: anchor.probability,
        });
    }
    if anchor.probability <= 0.0 || anchor.probability >= 1.0 {
        return Err(CalibrationError::ProbabilityOutOfRange {
            score: anchor.score,
            probability: anchor.probability,
        });
    }
    Ok(())
}

impl CalibrationCurve {
    /// Fit the curve through two anchors.
    ///
    /// Algorithm:
    /// 1. `L1 = logit(p1)`, `L2 = logit(p2)`
    /// 2. `a = (L2 - L1) / (s2 - s1)`
    /// 3. `b = s1 - L1 / a`
    ///
    /// Anchors may be given in either order. Two anchors with the same
    /// probability produce a flat line in log-odds space with no midpoint;
    /// that is reported as a probability error on the second anchor since
    /// no logistic curve passes through both.
    pub fn derive(anchor1: Anchor, anchor2: Anchor) -> Result<Self, CalibrationError> {
        check_anchor(&anchor1)?;
        check_anchor(&anchor2)?;

        if anchor1.score == anchor2.score {
            return Err(CalibrationError::DuplicateScore {
                score: anchor1.score,
            });
        }

        let l1 = logit(anchor1.probability);
        let l2 = logit(anchor2.probability);
        let a = (l2 - l1) / (anchor2.score - anchor1.score);
        if a == 0.0 {
            return Err(CalibrationError::ProbabilityOutOfRange {
                score: anchor2.score,
                probability: anchor2.probability,
            });
        }
        let b = anchor1.score - l1 / a;

        Ok(Self { a, b })
    }

    /// Derive from the `[calibration]` section of the model config.
    pub fn from_config(config: &CalibrationConfig) -> Result<Self, CalibrationError> {
        Self::derive(config.low_anchor, config.high_anchor)
    }

    /// Logistic probability at `score`. No floor is applied here.
    pub fn probability(&self, score: f64) -> f64 {
        1.0 / (1.0 + (-self.a * (score - self.b)).exp())
    }

    /// Sample the curve across [0, 100] every `step` points. The final
    /// point is always 100. Non-positive or non-finite steps fall back to
    /// 10; steps below [`MIN_TABLE_STEP`] are raised to it.
    pub fn table(&self, step: f64) -> Vec<(f64, f64)> {
        let step = if step.is_finite() && step > 0.0 {
            step.max(MIN_TABLE_STEP)
        } else {
            DEFAULT_TABLE_STEP
        };
        // Scores within rounding noise of 100 are covered by the final row.
        let limit = 100.0 - step * 1e-6;
        let count = (100.0 / step).ceil() as usize;

        let mut rows: Vec<(f64, f64)> = (0..count)
            .map(|i| i as f64 * step)
            .take_while(|&score| score < limit)
            .map(|score| (score, self.probability(score)))
            .collect();
        rows.push((100.0, self.probability(100.0)));
        rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
