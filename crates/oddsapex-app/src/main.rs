// oddsapex entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only reports)
// 2. Parse the command line
// 3. Load and validate config
// 4. Run the subcommand, print its report and any row diagnostics

use oddsapex_app::cli::{Cli, Commands};
use oddsapex_app::commands;
use oddsapex_app::config;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli);

    let config =
        config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    info!(
        "Config loaded: anchors ({}, {}) and ({}, {}), {}% Kelly",
        config.calibration.low_anchor.score,
        config.calibration.low_anchor.probability,
        config.calibration.high_anchor.score,
        config.calibration.high_anchor.probability,
        config.lay.kelly_fraction * 100.0
    );

    let output = match &cli.command {
        Commands::Score { players, format } => commands::run_score(&config, players, *format)?,
        Commands::Lay {
            table,
            bankroll,
            format,
        } => commands::run_lay(&config, table, bankroll, *format)?,
        Commands::Curve { step } => commands::run_curve(&config, *step)?,
    };

    for line in &output.diagnostics {
        eprintln!("skipped {line}");
    }
    print!("{}", output.report);

    Ok(())
}

/// Initialize the tracing subscriber, writing to stderr.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("oddsapex=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
