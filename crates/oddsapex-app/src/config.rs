// Configuration loading and validation (oddsapex.toml).
//
// Resolution order:
// 1. an explicit `--config <path>` (must exist);
// 2. `config/oddsapex.toml` under the working directory, if present;
// 3. the built-in model defaults.

use std::path::{Path, PathBuf};

use oddsapex_core::calibration::{CalibrationCurve, CalibrationError};
use oddsapex_core::ModelConfig;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_DIR: &str = "config";
pub const CONFIG_FILE: &str = "oddsapex.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("invalid calibration anchors: {0}")]
    Calibration(#[from] CalibrationError),
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate a specific config file.
pub fn load_config_file(path: &Path) -> Result<ModelConfig, ConfigError> {
    let text = read_file(path)?;
    let config = parse_config(&text, path)?;
    validate(&config)?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Load `config/oddsapex.toml` under `base_dir`, falling back to the
/// built-in defaults when the file does not exist.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<ModelConfig, ConfigError> {
    let path = base_dir.join(CONFIG_DIR).join(CONFIG_FILE);
    if path.exists() {
        return load_config_file(&path);
    }

    debug!("no config file at {}, using built-in defaults", path.display());
    let config = ModelConfig::default();
    validate(&config)?;
    Ok(config)
}

/// Resolve the configuration for this run. An explicit path wins; otherwise
/// the working directory is searched.
pub fn load_config(explicit: Option<&Path>) -> Result<ModelConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_config(text: &str, path: &Path) -> Result<ModelConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

/// Check every setting and derive the calibration curve so bad anchors fail
/// here rather than on the first evaluation.
pub fn validate(config: &ModelConfig) -> Result<(), ConfigError> {
    let scoring = &config.scoring;

    let floor = scoring.probability_floor;
    if !(floor > 0.0 && floor < 1.0) {
        return Err(invalid(
            "scoring.probability_floor",
            format!("must be between 0 and 1 exclusive, got {floor}"),
        ));
    }

    let cap = scoring.max_fair_odds;
    if !(cap.is_finite() && cap > 1.0) {
        return Err(invalid(
            "scoring.max_fair_odds",
            format!("must be greater than 1, got {cap}"),
        ));
    }

    let weight = scoring.model_weight;
    if !(0.0..=1.0).contains(&weight) {
        return Err(invalid(
            "scoring.model_weight",
            format!("must be between 0.0 and 1.0 inclusive, got {weight}"),
        ));
    }

    if scoring.finishes_window == 0 {
        return Err(invalid("scoring.finishes_window", "must be > 0".into()));
    }

    let kelly = config.lay.kelly_fraction;
    if !(kelly > 0.0 && kelly < 1.0) {
        return Err(invalid(
            "lay.kelly_fraction",
            format!("must be a fraction of full Kelly in (0, 1), got {kelly}"),
        ));
    }

    if config.output.currency_symbol.trim().is_empty() {
        return Err(invalid(
            "output.currency_symbol",
            "must not be empty".into(),
        ));
    }

    CalibrationCurve::from_config(&config.calibration)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
