// Heuristic player score, calibrated win probability, and market comparison.
//
// One evaluation takes a golfer's metric snapshot and a live price and
// produces a `ScoreResult`: the clamped 0-100 score, the calibrated (floored)
// probability, edge against the market, capped and blended fair odds, and
// the expected value of a unit back stake.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calibration::{CalibrationCurve, CalibrationError};
use crate::config::{ModelConfig, ScoringConfig};
use crate::odds;
use crate::probability::{CalibratedLogistic, WinProbability};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("expected {expected} recent finishes, got {actual}")]
    FinishCount { expected: usize, actual: usize },

    #[error("metric `{field}` must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("live odds must be greater than 0, got {odds}")]
    InvalidOdds { odds: f64 },
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One golfer's metric snapshot. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub expected_wins: f64,
    pub total_shots_gained: f64,
    pub putt: f64,
    pub tee_to_green: f64,
    pub sg_true: f64,
    pub sg_expected: f64,
    pub course_fit: f64,
    pub ranking: f64,
    /// Decimal odds currently offered.
    pub live_odds: f64,
    pub leaderboard_position: f64,
    pub shots_behind: f64,
    /// Most recent finishing positions; must hold exactly the configured
    /// window length.
    pub last_finishes: Vec<f64>,
    pub sg_off_tee: f64,
    pub sg_approach: f64,
    pub sg_putting: f64,
    /// Scrambling percentage, 0-100.
    pub scrambling: f64,
}

impl PlayerMetrics {
    /// Scalar fields paired with their names, in input order.
    fn named_values(&self) -> [(&'static str, f64); 15] {
        [
            ("expected_wins", self.expected_wins),
            ("total_shots_gained", self.total_shots_gained),
            ("putt", self.putt),
            ("tee_to_green", self.tee_to_green),
            ("sg_true", self.sg_true),
            ("sg_expected", self.sg_expected),
            ("course_fit", self.course_fit),
            ("ranking", self.ranking),
            ("live_odds", self.live_odds),
            ("leaderboard_position", self.leaderboard_position),
            ("shots_behind", self.shots_behind),
            ("sg_off_tee", self.sg_off_tee),
            ("sg_approach", self.sg_approach),
            ("sg_putting", self.sg_putting),
            ("scrambling", self.scrambling),
        ]
    }

    /// Mean of the recent finishes.
    pub fn average_finish(&self) -> f64 {
        if self.last_finishes.is_empty() {
            return 0.0;
        }
        self.last_finishes.iter().sum::<f64>() / self.last_finishes.len() as f64
    }

    fn validate(&self, finishes_window: usize) -> Result<(), ScoreError> {
        if self.last_finishes.len() != finishes_window {
            return Err(ScoreError::FinishCount {
                expected: finishes_window,
                actual: self.last_finishes.len(),
            });
        }
        for (field, value) in self.named_values() {
            if !value.is_finite() {
                return Err(ScoreError::NonFinite { field, value });
            }
        }
        if let Some(&value) = self.last_finishes.iter().find(|v| !v.is_finite()) {
            return Err(ScoreError::NonFinite {
                field: "last_finishes",
                value,
            });
        }
        if self.live_odds <= 0.0 {
            return Err(ScoreError::InvalidOdds {
                odds: self.live_odds,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Heuristic weights
// ---------------------------------------------------------------------------

/// Coefficients of the linear heuristic. These are fixed policy values, not
/// fitted parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicWeights {
    pub baseline: f64,
    pub expected_wins: f64,
    pub total_shots_gained: f64,
    pub putt: f64,
    pub tee_to_green: f64,
    /// Applied to `sg_true - sg_expected`.
    pub pressure: f64,
    pub course_fit: f64,
    pub ranking: f64,
    pub leaderboard_position: f64,
    pub shots_behind: f64,
    pub average_finish: f64,
    pub sg_off_tee: f64,
    pub sg_approach: f64,
    pub sg_putting: f64,
    /// Applied to `100 - scrambling`.
    pub scrambling_deficit: f64,
}

pub const HEURISTIC_WEIGHTS: HeuristicWeights = HeuristicWeights {
    baseline: 50.0,
    expected_wins: 1.0,
    total_shots_gained: 0.5,
    putt: 0.5,
    tee_to_green: 0.5,
    pressure: 15.0,
    course_fit: 20.0,
    ranking: -0.5,
    leaderboard_position: -0.3,
    shots_behind: -0.2,
    average_finish: -0.5,
    sg_off_tee: 0.5,
    sg_approach: 0.5,
    sg_putting: 0.5,
    scrambling_deficit: -0.2,
};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Unclamped heuristic score.
pub fn raw_score(metrics: &PlayerMetrics, w: &HeuristicWeights) -> f64 {
    let pressure = metrics.sg_true - metrics.sg_expected;
    w.baseline
        + metrics.expected_wins * w.expected_wins
        + metrics.total_shots_gained * w.total_shots_gained
        + metrics.putt * w.putt
        + metrics.tee_to_green * w.tee_to_green
        + pressure * w.pressure
        + metrics.course_fit * w.course_fit
        + metrics.ranking * w.ranking
        + metrics.leaderboard_position * w.leaderboard_position
        + metrics.shots_behind * w.shots_behind
        + metrics.average_finish() * w.average_finish
        + metrics.sg_off_tee * w.sg_off_tee
        + metrics.sg_approach * w.sg_approach
        + metrics.sg_putting * w.sg_putting
        + (100.0 - metrics.scrambling) * w.scrambling_deficit
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Output of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Heuristic score before clamping.
    pub raw_score: f64,
    /// Heuristic score clamped to [0, 100].
    pub score: f64,
    /// Calibrated, floored win probability.
    pub model_probability: f64,
    pub implied_probability: f64,
    pub edge: f64,
    /// `1 / model_probability`, capped.
    pub model_fair_odds: f64,
    /// Model fair odds blended toward the market price.
    pub fair_odds: f64,
    pub live_odds: f64,
    /// Expected profit of a unit back stake at `live_odds`.
    pub expected_value: f64,
}

impl ScoreResult {
    pub fn has_value(&self) -> bool {
        self.edge > 0.0
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate one golfer against a calibration curve.
pub fn evaluate(
    metrics: &PlayerMetrics,
    curve: &CalibrationCurve,
    scoring: &ScoringConfig,
) -> Result<ScoreResult, ScoreError> {
    let policy = CalibratedLogistic::new(*curve, scoring.probability_floor);
    evaluate_with(metrics, &policy, scoring)
}

fn evaluate_with<P: WinProbability>(
    metrics: &PlayerMetrics,
    policy: &P,
    scoring: &ScoringConfig,
) -> Result<ScoreResult, ScoreError> {
    if let Err(e) = metrics.validate(scoring.finishes_window) {
        warn!("rejecting metrics: {}", e);
        return Err(e);
    }

    let raw = raw_score(metrics, &HEURISTIC_WEIGHTS);
    if raw.is_nan() {
        return Err(ScoreError::NonFinite {
            field: "score",
            value: raw,
        });
    }
    let score = raw.clamp(SCORE_MIN, SCORE_MAX);

    let model_probability = policy.win_probability(score);
    let live_odds = metrics.live_odds;
    let implied_probability = odds::implied_probability(live_odds);
    let edge = odds::edge(model_probability, live_odds);

    let model_fair_odds = odds::fair_odds(model_probability).min(scoring.max_fair_odds);
    let fair_odds =
        scoring.model_weight * model_fair_odds + (1.0 - scoring.model_weight) * live_odds;

    let expected_value = odds::back_ev(model_probability, live_odds);

    debug!(
        raw,
        score, model_probability, edge, fair_odds, expected_value, "evaluated golfer"
    );

    Ok(ScoreResult {
        raw_score: raw,
        score,
        model_probability,
        implied_probability,
        edge,
        model_fair_odds,
        fair_odds,
        live_odds,
        expected_value,
    })
}

/// A calibrated score model, built once and reused for every golfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreModel {
    policy: CalibratedLogistic,
    scoring: ScoringConfig,
}

impl ScoreModel {
    /// Derive the calibration curve from the config. Fails on invalid anchors.
    pub fn new(config: &ModelConfig) -> Result<Self, CalibrationError> {
        let curve = CalibrationCurve::from_config(&config.calibration)?;
        Ok(Self::with_curve(curve, config.scoring))
    }

    pub fn with_curve(curve: CalibrationCurve, scoring: ScoringConfig) -> Self {
        Self {
            policy: CalibratedLogistic::new(curve, scoring.probability_floor),
            scoring,
        }
    }

    pub fn curve(&self) -> &CalibrationCurve {
        self.policy.curve()
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn evaluate(&self, metrics: &PlayerMetrics) -> Result<ScoreResult, ScoreError> {
        evaluate_with(metrics, &self.policy, &self.scoring)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn model() -> ScoreModel {
        ScoreModel::new(&ModelConfig::default()).unwrap()
    }

    /// Neutral metrics: every term zero except what the scrambling term
    /// needs to cancel (scrambling = 100).
    fn neutral(live_odds: f64) -> PlayerMetrics {
        PlayerMetrics {
            expected_wins: 0.0,
            total_shots_gained: 0.0,
            putt: 0.0,
            tee_to_green: 0.0,
            sg_true: 0.0,
            sg_expected: 0.0,
            course_fit: 0.0,
            ranking: 0.0,
            live_odds,
            leaderboard_position: 0.0,
            shots_behind: 0.0,
            last_finishes: vec![0.0; 5],
            sg_off_tee: 0.0,
            sg_approach: 0.0,
            sg_putting: 0.0,
            scrambling: 100.0,
        }
    }

    #[test]
    fn neutral_metrics_score_baseline() {
        let result = model().evaluate(&neutral(10.0)).unwrap();
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn course_fit_example_scores_seventy() {
        let mut m = neutral(10.0);
        m.course_fit = 1.0;
        let result = model().evaluate(&m).unwrap();
        assert_eq!(result.score, 70.0);
        assert!(approx_eq(result.model_probability, 0.184632504, 1e-8));
        assert!(approx_eq(result.implied_probability, 0.1, 1e-12));
        assert!(approx_eq(result.edge, 0.084632504, 1e-8));
        assert!(approx_eq(result.model_fair_odds, 5.416164422, 1e-8));
        assert!(approx_eq(result.fair_odds, 6.791315095, 1e-8));
        assert!(approx_eq(result.expected_value, 0.846325041, 1e-8));
        assert!(result.has_value());
    }

    #[test]
    fn zero_scrambling_costs_twenty_points() {
        let mut m = neutral(10.0);
        m.course_fit = 1.0;
        m.scrambling = 0.0;
        let result = model().evaluate(&m).unwrap();
        assert_eq!(result.score, 50.0);
        assert!(approx_eq(result.model_probability, 0.051701741, 1e-8));
        assert!(result.expected_value < 0.0);
        assert!(!result.has_value());
    }

    #[test]
    fn each_weight_contributes_as_documented() {
        let base = raw_score(&neutral(10.0), &HEURISTIC_WEIGHTS);
        let cases: [(fn(&mut PlayerMetrics), f64); 15] = [
            (|m| m.expected_wins = 2.0, 2.0),
            (|m| m.total_shots_gained = 2.0, 1.0),
            (|m| m.putt = 2.0, 1.0),
            (|m| m.tee_to_green = 2.0, 1.0),
            (|m| m.sg_true = 1.0, 15.0),
            (|m| m.sg_expected = 1.0, -15.0),
            (|m| m.course_fit = 0.5, 10.0),
            (|m| m.ranking = 10.0, -5.0),
            (|m| m.leaderboard_position = 10.0, -3.0),
            (|m| m.shots_behind = 10.0, -2.0),
            (|m| m.last_finishes = vec![10.0; 5], -5.0),
            (|m| m.sg_off_tee = 2.0, 1.0),
            (|m| m.sg_approach = 2.0, 1.0),
            (|m| m.sg_putting = 2.0, 1.0),
            (|m| m.scrambling = 90.0, -2.0),
        ];
        for (i, (apply, delta)) in cases.into_iter().enumerate() {
            let mut m = neutral(10.0);
            apply(&mut m);
            let got = raw_score(&m, &HEURISTIC_WEIGHTS) - base;
            assert!(approx_eq(got, delta, 1e-9), "case {i}: got {got}, want {delta}");
        }
    }

    #[test]
    fn score_clamps_high_and_low() {
        let mut high = neutral(5.0);
        high.course_fit = 10.0;
        let result = model().evaluate(&high).unwrap();
        assert_eq!(result.raw_score, 250.0);
        assert_eq!(result.score, 100.0);

        let mut low = neutral(500.0);
        low.ranking = 300.0;
        let result = model().evaluate(&low).unwrap();
        assert!(result.raw_score < 0.0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.model_probability, 0.02);
    }

    #[test]
    fn fair_odds_capped_before_blend() {
        // Floored probability 2% gives exactly the 50x cap.
        let mut m = neutral(200.0);
        m.ranking = 100.0;
        let result = model().evaluate(&m).unwrap();
        assert_eq!(result.model_probability, 0.02);
        assert!(result.model_fair_odds <= 50.0);
        assert!(approx_eq(result.fair_odds, 0.7 * 50.0 + 0.3 * 200.0, 1e-9));
    }

    #[test]
    fn tighter_cap_is_respected() {
        let scoring = ScoringConfig {
            max_fair_odds: 10.0,
            ..ScoringConfig::default()
        };
        let curve = CalibrationCurve::from_config(&Default::default()).unwrap();
        let result = evaluate(&neutral(10.0), &curve, &scoring).unwrap();
        // Score 50 gives ~19.3x raw fair odds.
        assert_eq!(result.model_fair_odds, 10.0);
    }

    #[test]
    fn wrong_finish_count_is_rejected() {
        for n in [0, 4, 6] {
            let mut m = neutral(10.0);
            m.last_finishes = vec![1.0; n];
            let err = model().evaluate(&m).unwrap_err();
            assert_eq!(err, ScoreError::FinishCount { expected: 5, actual: n });
        }
    }

    #[test]
    fn non_finite_metric_is_rejected() {
        let mut m = neutral(10.0);
        m.putt = f64::NAN;
        match model().evaluate(&m).unwrap_err() {
            ScoreError::NonFinite { field, .. } => assert_eq!(field, "putt"),
            other => panic!("expected NonFinite, got {other:?}"),
        }

        let mut m = neutral(10.0);
        m.last_finishes[2] = f64::INFINITY;
        match model().evaluate(&m).unwrap_err() {
            ScoreError::NonFinite { field, .. } => assert_eq!(field, "last_finishes"),
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_odds_are_rejected() {
        for odds in [0.0, -3.0] {
            let err = model().evaluate(&neutral(odds)).unwrap_err();
            assert_eq!(err, ScoreError::InvalidOdds { odds });
        }
    }

    #[test]
    fn free_function_matches_model() {
        let m = {
            let mut m = neutral(12.0);
            m.course_fit = 0.3;
            m.sg_true = 1.2;
            m.sg_expected = 0.8;
            m.last_finishes = vec![3.0, 12.0, 8.0, 1.0, 25.0];
            m
        };
        let model = model();
        let a = model.evaluate(&m).unwrap();
        let b = evaluate(&m, model.curve(), model.scoring()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut m = neutral(15.0);
        m.expected_wins = 1.7;
        m.shots_behind = 3.0;
        let model = model();
        assert_eq!(model.evaluate(&m).unwrap(), model.evaluate(&m).unwrap());
    }

    #[test]
    fn ev_sign_matches_edge_sign() {
        let model = model();
        for fit in [-1.0, -0.5, 0.0, 0.25, 0.5, 1.0, 1.5] {
            for odds in [3.0, 8.0, 15.0, 40.0, 120.0] {
                let mut m = neutral(odds);
                m.course_fit = fit;
                let r = model.evaluate(&m).unwrap();
                assert_eq!(r.edge > 0.0, r.expected_value > 0.0, "fit={fit} odds={odds}");
            }
        }
    }
}
