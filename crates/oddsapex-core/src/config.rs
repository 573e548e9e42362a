// Model configuration: calibration anchors, scoring limits, Kelly fraction.
//
// The defaults are the constants the model was tuned with. A configuration
// file may restate or override them; the app crate owns file loading and
// validation.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Low calibration anchor: a score of 20 maps to a 0.64% win probability.
pub const DEFAULT_LOW_ANCHOR: Anchor = Anchor {
    score: 20.0,
    probability: 0.0064,
};

/// High calibration anchor: a score of 60 maps to a 10% win probability.
pub const DEFAULT_HIGH_ANCHOR: Anchor = Anchor {
    score: 60.0,
    probability: 0.10,
};

/// No finishing entrant is ever given less than a 2% chance.
pub const DEFAULT_PROBABILITY_FLOOR: f64 = 0.02;

/// Model-derived fair odds are capped at 50x before blending.
pub const DEFAULT_MAX_FAIR_ODDS: f64 = 50.0;

/// Share of the blended fair odds taken from the model (the rest is market).
pub const DEFAULT_MODEL_WEIGHT: f64 = 0.7;

/// Number of recent finishes averaged into the form term.
pub const DEFAULT_FINISHES_WINDOW: usize = 5;

/// Quarter Kelly.
pub const DEFAULT_KELLY_FRACTION: f64 = 0.25;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Everything the calculators need, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ModelConfig {
    pub calibration: CalibrationConfig,
    pub scoring: ScoringConfig,
    pub lay: LayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A (score, probability) reference point on the logistic curve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Anchor {
    pub score: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CalibrationConfig {
    pub low_anchor: Anchor,
    pub high_anchor: Anchor,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            low_anchor: DEFAULT_LOW_ANCHOR,
            high_anchor: DEFAULT_HIGH_ANCHOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoringConfig {
    pub probability_floor: f64,
    pub max_fair_odds: f64,
    /// Weight of the model fair odds in the blend; the market price gets
    /// `1 - model_weight`.
    pub model_weight: f64,
    pub finishes_window: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            probability_floor: DEFAULT_PROBABILITY_FLOOR,
            max_fair_odds: DEFAULT_MAX_FAIR_ODDS,
            model_weight: DEFAULT_MODEL_WEIGHT,
            finishes_window: DEFAULT_FINISHES_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayConfig {
    /// Multiplier applied to the full Kelly fraction.
    pub kelly_fraction: f64,
}

impl Default for LayConfig {
    fn default() -> Self {
        Self {
            kelly_fraction: DEFAULT_KELLY_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    pub currency_symbol: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}
