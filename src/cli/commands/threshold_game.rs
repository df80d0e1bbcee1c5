//! Threshold game command - Play the threshold selection game on one network

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use super::{GameReport, resolve_nodes};
use crate::{
    cli::config::{CommonConfig, DatasetArgs, ThresholdArgs},
    export::write_thresholds,
    game::{
        DEFAULT_MAX_ROUNDS, DEFAULT_SEED, GameContext, GameKind, ThresholdConfiguration,
        ThresholdSelectionGame,
    },
    types::DiffuserMode,
};

#[derive(Parser, Debug)]
#[command(about = "Play the threshold selection game")]
pub struct ThresholdGameArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Share of nodes drawn as the initial set
    #[arg(long, default_value_t = 0.2)]
    pub initial_proportion: f64,

    /// Explicit initial node ids (overrides --initial-proportion)
    #[arg(long, value_delimiter = ',')]
    pub initial: Vec<i64>,

    /// Share of nodes drawn as targets
    #[arg(long, default_value_t = 0.2)]
    pub target_proportion: f64,

    /// Explicit target node ids (overrides --target-proportion)
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<i64>,

    /// Diffuser objective (cooperative or malicious)
    #[arg(long, default_value = "malicious")]
    pub mode: DiffuserMode,

    /// Starting thresholds (empty, complete, random, current)
    #[arg(long, default_value = "empty")]
    pub configuration: ThresholdConfiguration,

    /// Round cap of the best-response dynamics
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Write the final thresholds as `Node,Threshold` CSV
    #[arg(long)]
    pub thresholds_out: Option<PathBuf>,

    /// Write the game report as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ThresholdGameArgs, common: &CommonConfig) -> Result<()> {
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

    // initial nodes first, so targets never displace them
    let mut context = GameContext::with_seed(graph.node_count(), args.seed);
    if args.initial.is_empty() {
        context.select_initial_proportion(args.initial_proportion)?;
    } else {
        let initial = resolve_nodes(&graph, &args.initial, "--initial")?;
        context.select_initial_nodes(initial)?;
    }
    if args.targets.is_empty() {
        context.select_target_proportion(args.target_proportion)?;
    } else {
        let targets = resolve_nodes(&graph, &args.targets, "--targets")?;
        context.select_target_nodes(targets)?;
    }

    let summary = {
        let mut game = ThresholdSelectionGame::new(&mut graph, &mut context, args.mode)?;
        game.initialize(args.configuration);
        game.game_dynamics(args.max_rounds)?
    };

    let report = GameReport::new(
        GameKind::ThresholdSelection,
        &spec.name,
        &graph,
        &context,
        summary,
    );
    report.print(&graph, &context);

    if let Some(path) = &args.thresholds_out {
        write_thresholds(path, graph.mapping(), graph.thresholds())?;
        println!("\nThresholds written to: {}", path.display());
    }
    if let Some(path) = &args.output {
        report.save(path)?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}
