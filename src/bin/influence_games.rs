//! Influence games CLI - Seed and threshold selection games on networks
//!
//! This CLI provides a unified interface for:
//! - Playing the seed selection game on one network
//! - Playing the threshold selection game on one network
//! - Running the threshold sweep and diffuser experiments

use anyhow::Result;
use clap::{Parser, Subcommand};
use influence_games::cli::{
    commands::{experiment, seed_game, threshold_game},
    config::CommonConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "influence-games")]
#[command(version, about = "Best-response influence games on weighted networks", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the seed selection game
    SeedGame(Box<seed_game::SeedGameArgs>),

    /// Play the threshold selection game
    ThresholdGame(Box<threshold_game::ThresholdGameArgs>),

    /// Run the threshold sweep or diffuser experiment
    Experiment(experiment::ExperimentArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let common = CommonConfig {
        progress: !cli.no_progress,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::SeedGame(args) => seed_game::execute(*args, &common),
        Commands::ThresholdGame(args) => threshold_game::execute(*args, &common),
        Commands::Experiment(args) => experiment::execute(args, &common),
    }
}
