// Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Default sampling interval for `curve`, in score points.
pub const DEFAULT_CURVE_STEP: f64 = 10.0;

#[derive(Debug, Parser)]
#[command(name = "oddsapex")]
#[command(version, about = "Golf outright win model and lay staking", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: config/oddsapex.toml if present, else built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score every golfer in a metrics CSV against their live odds
    Score {
        /// Golfer metrics CSV, one row per golfer
        players: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ScoreFormat::Summary)]
        format: ScoreFormat,
    },

    /// Rank and size lay bets from a `name | score | odds` table
    Lay {
        /// Table file, or `-` for stdin
        table: PathBuf,

        /// Bankroll to size stakes against
        #[arg(long, allow_hyphen_values = true)]
        bankroll: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = LayFormat::Report)]
        format: LayFormat,
    },

    /// Print the calibrated score-to-probability curve
    Curve {
        /// Score interval between rows
        #[arg(long, default_value_t = DEFAULT_CURVE_STEP)]
        step: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoreFormat {
    /// One summary line per golfer
    Summary,
    /// JSON array of results
    Json,
    /// `name | probability% | odds` rows, ready for `lay`
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayFormat {
    /// Human-readable staking report
    Report,
    /// JSON lay book
    Json,
}
