//! Command-line entry point for running a trajectory sweep.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracksim_core::RandomSource;
use tracksim_sweep::{SweepConfig, SweepError, run};

#[derive(Parser, Debug)]
#[command(name = "tracksim-sweep")]
#[command(about = "Generate labelled diffusion trajectories with computed features")]
struct Cli {
    /// TOML file overriding the default sweep parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the JSON files are written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Seed overriding the one in the config
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracksim_sweep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<(), SweepError> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            SweepConfig::from_path(path)?
        }
        None => SweepConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut rng = RandomSource::from_seed(config.seed);
    let output = run(&config, &mut rng)?;
    output.write(&cli.out)?;

    info!("Wrote {} tracks to {}", output.len(), cli.out.display());
    Ok(())
}

/// Joins an error and its sources into one line.
fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
