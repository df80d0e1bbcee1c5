//! Experiment command - Run the threshold sweep or the diffuser experiment

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::CommonConfig,
        output::{print_kv, print_section, print_subsection},
    },
    pipeline::{Experiment, ExperimentConfig, ExperimentKind, LogObserver, ProgressObserver},
};

#[derive(Parser, Debug)]
#[command(about = "Run an experiment from a JSON configuration")]
pub struct ExperimentArgs {
    /// Experiment configuration (JSON)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Which experiment to run (threshold-sweep or diffuser)
    #[arg(long, short = 'k', default_value = "threshold-sweep")]
    pub kind: ExperimentKind,

    /// Override the configured output directory
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Override the configured repetition count
    #[arg(long, short = 'r')]
    pub repetitions: Option<usize>,
}

pub fn execute(args: ExperimentArgs, common: &CommonConfig) -> Result<()> {
    let mut config = ExperimentConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(repetitions) = args.repetitions {
        config.repetitions = repetitions;
    }

    print_section(&format!("Experiment: {}", args.kind));
    print_kv("Datasets", &config.datasets.len().to_string());
    print_kv("Repetitions", &config.repetitions.to_string());
    print_kv("Seed", &config.seed.to_string());

    let mut experiment = Experiment::new(config, args.kind).with_observer(Box::new(LogObserver));
    if common.progress {
        experiment = experiment.with_observer(Box::new(ProgressObserver::new()));
    }
    print_kv("Output", &experiment.output_dir().display().to_string());

    let summary = experiment.run()?;

    print_subsection("Target coverage (seed game / threshold game)");
    for cell in &summary.cells {
        println!(
            "  {:20} th={:.2}  {:6.1}% / {:6.1}%",
            cell.dataset,
            cell.factor,
            cell.seed_game.influence_target_prop * 100.0,
            cell.threshold_game.influence_target_prop * 100.0
        );
    }

    let round_limit_hits: usize = summary.cells.iter().map(|c| c.round_limit_hits).sum();
    if round_limit_hits > 0 {
        println!("\n{round_limit_hits} game runs stopped at the round limit");
    }
    if common.verbose {
        print_subsection("Files");
        for file in &summary.files {
            println!("  {}", file.display());
        }
    } else {
        println!("\n{} files written", summary.files.len());
    }

    Ok(())
}
