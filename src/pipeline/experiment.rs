//! Experiment driver
//!
//! An experiment is a list of cells, one per (threshold factor, dataset)
//! pair. Cells run in parallel, each on its own copy of the graph and with a
//! private generator seeded from the configured seed plus the cell index.
//! Results are written once every cell has finished, in cell order.

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::{
    config::{ExperimentConfig, ExperimentKind},
    observers::ExperimentObserver,
};
use crate::{
    Result,
    adapters::DatasetSpec,
    analysis::{RunOutcome, Statistics, StatisticsRecord},
    export::{StatisticsWriter, write_thresholds},
    game::{
        GameContext, GameKind, RoundSummary, SeedConfiguration, SeedSelectionGame,
        ThresholdSelectionGame,
    },
    graph::WeightedGraph,
    types::DiffuserMode,
};

/// One unit of parallel work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSpec {
    pub index: usize,
    pub dataset: String,
    pub dataset_index: usize,
    pub factor: f64,
}

/// Aggregated outcome of one cell
#[derive(Debug, Clone, Serialize)]
pub struct CellResult {
    pub index: usize,
    pub dataset: String,
    pub factor: f64,
    pub nodes: usize,
    /// Statistics of the seed selection game ("model-1")
    pub seed_game: StatisticsRecord,
    /// Statistics of the threshold selection game ("model-2")
    pub threshold_game: StatisticsRecord,
    /// External node ids, aligned with `threshold_ratios`
    pub external_ids: Vec<i64>,
    /// Average threshold to in-degree ratio per node after the threshold game
    pub threshold_ratios: Vec<f64>,
    /// Game runs that stopped at the round limit
    pub round_limit_hits: usize,
}

impl CellResult {
    pub fn record(&self, game: GameKind) -> &StatisticsRecord {
        match game {
            GameKind::SeedSelection => &self.seed_game,
            GameKind::ThresholdSelection => &self.threshold_game,
        }
    }
}

/// Everything an experiment produced
#[derive(Debug, Clone)]
pub struct ExperimentSummary {
    pub kind: ExperimentKind,
    pub cells: Vec<CellResult>,
    /// Files written, in creation order
    pub files: Vec<PathBuf>,
}

/// Runs one of the canonical experiments over the configured datasets
pub struct Experiment {
    config: ExperimentConfig,
    kind: ExperimentKind,
    observers: Vec<Box<dyn ExperimentObserver>>,
}

impl Experiment {
    pub fn new(config: ExperimentConfig, kind: ExperimentKind) -> Self {
        Self {
            config,
            kind,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ExperimentObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn kind(&self) -> ExperimentKind {
        self.kind
    }

    /// Diffuser objective used in this experiment's threshold games
    pub fn threshold_mode(&self) -> DiffuserMode {
        match self.kind {
            ExperimentKind::ThresholdSweep => self.config.sweep_mode,
            ExperimentKind::Diffuser => self.config.mode,
        }
    }

    /// Cells in output order: factor-major for the sweep, one per dataset
    /// for the diffuser experiment.
    pub fn cells(&self) -> Vec<CellSpec> {
        let factors = match self.kind {
            ExperimentKind::ThresholdSweep => self.config.factors.clone(),
            ExperimentKind::Diffuser => vec![self.config.diffuser_factor],
        };

        factors
            .into_iter()
            .flat_map(|factor| {
                self.config
                    .datasets
                    .iter()
                    .enumerate()
                    .map(move |(dataset_index, dataset)| (factor, dataset_index, dataset))
            })
            .enumerate()
            .map(|(index, (factor, dataset_index, dataset))| CellSpec {
                index,
                dataset: dataset.name.clone(),
                dataset_index,
                factor,
            })
            .collect()
    }

    /// Load the datasets, run every cell and write the result files.
    pub fn run(&self) -> Result<ExperimentSummary> {
        self.config.validate()?;

        let graphs: Vec<WeightedGraph> = self
            .config
            .datasets
            .par_iter()
            .map(DatasetSpec::load)
            .collect::<Result<_>>()?;

        let cells = self.cells();
        info!(
            experiment = %self.kind,
            cells = cells.len(),
            repetitions = self.config.repetitions,
            "running experiment"
        );
        for observer in &self.observers {
            observer.on_experiment_start(cells.len())?;
        }

        let results: Vec<CellResult> = cells
            .par_iter()
            .map(|cell| {
                for observer in &self.observers {
                    observer.on_cell_start(cell);
                }
                let result = self.run_cell(cell, &graphs[cell.dataset_index])?;
                for observer in &self.observers {
                    observer.on_cell_end(&result);
                }
                Ok(result)
            })
            .collect::<Result<_>>()?;

        let files = self.write_results(&results)?;

        for observer in &self.observers {
            observer.on_experiment_end()?;
        }

        Ok(ExperimentSummary {
            kind: self.kind,
            cells: results,
            files,
        })
    }

    /// Run all repetitions of one cell on a copy of `graph`.
    pub fn run_cell(&self, cell: &CellSpec, graph: &WeightedGraph) -> Result<CellResult> {
        let mut graph = graph.clone();
        let nodes = graph.node_count();
        let mut rng = StdRng::seed_from_u64(self.config.cell_seed(cell.index));

        let mut seed_stats = Statistics::new();
        let mut threshold_stats = Statistics::with_thresholds(nodes);
        let mut round_limit_hits = 0;

        for repetition in 0..self.config.repetitions {
            graph.assign_fixed(cell.factor)?;
            let mut context = GameContext::with_seed(nodes, rng.random());

            let (seed_summary, threshold_summary) = match self.kind {
                ExperimentKind::ThresholdSweep => {
                    context.select_target_proportion_with(self.config.target_proportion, &mut rng)?;

                    let seed_summary =
                        self.play_seed_game(&graph, &mut context, &self.config.seed_configuration)?;
                    seed_stats.update(&graph, RunOutcome::from_context(&context, seed_summary.rounds))?;

                    let threshold_summary = self.play_threshold_game(&mut graph, &mut context)?;
                    threshold_stats.update(
                        &graph,
                        RunOutcome::from_context(&context, threshold_summary.rounds),
                    )?;
                    (seed_summary, threshold_summary)
                }
                ExperimentKind::Diffuser => {
                    context
                        .select_initial_proportion_with(self.config.initial_proportion, &mut rng)?;
                    context.select_target_proportion_with(self.config.target_proportion, &mut rng)?;

                    let threshold_summary = self.play_threshold_game(&mut graph, &mut context)?;
                    threshold_stats.update(
                        &graph,
                        RunOutcome::from_context(&context, threshold_summary.rounds),
                    )?;

                    let seed_summary = self.play_seed_game(
                        &graph,
                        &mut context,
                        &SeedConfiguration::FromInitialSet,
                    )?;
                    seed_stats.update(&graph, RunOutcome::from_context(&context, seed_summary.rounds))?;
                    (seed_summary, threshold_summary)
                }
            };

            round_limit_hits += [seed_summary, threshold_summary]
                .iter()
                .filter(|summary| !summary.converged())
                .count();
            debug!(
                cell = cell.index,
                repetition,
                seed_rounds = seed_summary.rounds,
                threshold_rounds = threshold_summary.rounds,
                "repetition finished"
            );
        }

        seed_stats.finalize(self.config.repetitions)?;
        threshold_stats.finalize(self.config.repetitions)?;

        Ok(CellResult {
            index: cell.index,
            dataset: cell.dataset.clone(),
            factor: cell.factor,
            nodes,
            seed_game: seed_stats.record(&cell.dataset, nodes),
            threshold_game: threshold_stats.record(&cell.dataset, nodes),
            external_ids: graph.mapping().to_vec(),
            threshold_ratios: threshold_stats
                .thresholds()
                .map(<[f64]>::to_vec)
                .unwrap_or_default(),
            round_limit_hits,
        })
    }

    fn play_seed_game(
        &self,
        graph: &WeightedGraph,
        context: &mut GameContext,
        configuration: &SeedConfiguration,
    ) -> Result<RoundSummary> {
        let mut game = SeedSelectionGame::new(graph, context)?.with_alpha(self.config.alpha)?;
        game.initialize(configuration)?;
        game.game_dynamics(self.config.max_rounds)
    }

    fn play_threshold_game(
        &self,
        graph: &mut WeightedGraph,
        context: &mut GameContext,
    ) -> Result<RoundSummary> {
        let mut game = ThresholdSelectionGame::new(graph, context, self.threshold_mode())?;
        game.initialize(self.config.threshold_configuration);
        game.game_dynamics(self.config.max_rounds)
    }

    /// Directory of the experiment, below the configured output directory
    pub fn output_dir(&self) -> PathBuf {
        match self.kind {
            ExperimentKind::ThresholdSweep => self
                .config
                .output_dir
                .join(self.kind.label())
                .join(self.config.seed_configuration.label()),
            ExperimentKind::Diffuser => self
                .config
                .output_dir
                .join(self.kind.label())
                .join(self.config.mode.label()),
        }
    }

    fn write_results(&self, results: &[CellResult]) -> Result<Vec<PathBuf>> {
        let base = self.output_dir();
        let mut files = Vec::new();

        match self.kind {
            ExperimentKind::ThresholdSweep => {
                let per_factor = self.config.datasets.len().max(1);
                for group in results.chunks(per_factor) {
                    let Some(first) = group.first() else {
                        continue;
                    };
                    let dir = base.join(format!("th-{:.2}", first.factor));
                    files.extend(write_group(&dir, group)?);
                }
            }
            ExperimentKind::Diffuser => files.extend(write_group(&base, results)?),
        }

        info!(files = files.len(), dir = %base.display(), "results written");
        Ok(files)
    }
}

fn write_group(dir: &Path, results: &[CellResult]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for game in GameKind::ALL {
        let writer = StatisticsWriter::create(dir.join(format!("{}.csv", game.model_name())))?;
        for result in results {
            writer.append(result.record(game))?;
        }
        files.push(writer.path().to_path_buf());
    }

    for result in results {
        let path = dir
            .join("thresholds")
            .join(format!("{}.csv", result.dataset));
        write_thresholds(&path, &result.external_ids, &result.threshold_ratios)?;
        files.push(path);
    }

    Ok(files)
}

/// Run the threshold sweep without observers
pub fn run_threshold_sweep(config: ExperimentConfig) -> Result<ExperimentSummary> {
    Experiment::new(config, ExperimentKind::ThresholdSweep).run()
}

/// Run the diffuser experiment without observers
pub fn run_diffuser(config: ExperimentConfig) -> Result<ExperimentSummary> {
    Experiment::new(config, ExperimentKind::Diffuser).run()
}
