//! Seed game command - Play the seed selection game on one network

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use super::{GameReport, resolve_nodes};
use crate::{
    cli::config::{CommonConfig, DatasetArgs, ThresholdArgs},
    game::{
        DEFAULT_ALPHA, DEFAULT_MAX_ROUNDS, DEFAULT_SEED, GameContext, GameKind, SeedConfiguration,
        SeedSelectionGame,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Play the seed selection game")]
pub struct SeedGameArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Share of nodes drawn as targets
    #[arg(long, default_value_t = 0.2)]
    pub target_proportion: f64,

    /// Explicit target node ids (overrides --target-proportion)
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<i64>,

    /// Starting profile (empty, complete, random)
    #[arg(long, default_value = "complete")]
    pub configuration: SeedConfiguration,

    /// Participation cost
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Round cap of the best-response dynamics
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Write the game report as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: SeedGameArgs, common: &CommonConfig) -> Result<()> {
    let spec = args.dataset.to_spec();
    let mut graph = spec
        .load()
        .with_context(|| format!("Failed to load {}", spec.edges.display()))?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let assignment = graph.assign_thresholds(&args.thresholds.policy()?, &mut rng)?;
    if common.verbose {
        println!(
            "Thresholds assigned to {} nodes ({} ranked ids not found)",
            assignment.assigned, assignment.unmapped
        );
    }

    let mut context = GameContext::with_seed(graph.node_count(), args.seed);
    if args.targets.is_empty() {
        context.select_target_proportion(args.target_proportion)?;
    } else {
        let targets = resolve_nodes(&graph, &args.targets, "--targets")?;
        context.select_target_nodes(targets)?;
    }

    let summary = {
        let mut game = SeedSelectionGame::new(&graph, &mut context)?.with_alpha(args.alpha)?;
        game.initialize(&args.configuration)?;
        game.game_dynamics(args.max_rounds)?
    };

    let report = GameReport::new(GameKind::SeedSelection, &spec.name, &graph, &context, summary);
    report.print(&graph, &context);

    if let Some(path) = &args.output {
        report.save(path)?;
        println!("\nReport saved to: {}", path.display());
    }

    Ok(())
}
