// Odds Apex model: calibrated golf win probabilities, value against the
// market, and fractional-Kelly lay sizing.
//
// Everything here is pure computation over values handed in by the caller.
// File formats, tables, and the command line live in `oddsapex-app`.

pub mod calibration;
pub mod config;
pub mod lay;
pub mod odds;
pub mod probability;
pub mod report;
pub mod score;

pub use calibration::{CalibrationCurve, CalibrationError};
pub use config::ModelConfig;
pub use lay::{build_lay_list, Bankroll, LayBook, LayCandidate, LayError, LayRow};
pub use score::{PlayerMetrics, ScoreError, ScoreModel, ScoreResult};
