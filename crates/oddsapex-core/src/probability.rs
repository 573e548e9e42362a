// Score-to-probability policies.
//
// The score model and the lay book read scores of different shapes: the
// score model produces a raw 0-100 heuristic that needs calibrating, while
// lay tables carry scores that are already percentages. Each shape gets its
// own named policy.

use crate::calibration::CalibrationCurve;

/// Maps a score to a win probability.
pub trait WinProbability {
    fn win_probability(&self, score: f64) -> f64;
}

/// Logistic calibration followed by a probability floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedLogistic {
    curve: CalibrationCurve,
    floor: f64,
}

impl CalibratedLogistic {
    pub fn new(curve: CalibrationCurve, floor: f64) -> Self {
        Self { curve, floor }
    }

    pub fn curve(&self) -> &CalibrationCurve {
        &self.curve
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }
}

impl WinProbability for CalibratedLogistic {
    fn win_probability(&self, score: f64) -> f64 {
        self.curve.probability(score).max(self.floor)
    }
}

/// Reads the score as a percentage: `score / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScorePercentage;

impl WinProbability for ScorePercentage {
    fn win_probability(&self, score: f64) -> f64 {
        score / 100.0
    }
}
