//! Influence games on weighted networks
//!
//! This crate provides:
//! - Weighted directed networks with linear-threshold diffusion
//! - Threshold assignment (fixed factor, random draws, imported rankings)
//! - The seed selection game, where players decide whether to participate
//!   in the initial set
//! - The threshold selection game, where a cooperative or malicious diffuser
//!   picks node thresholds
//! - Per-run statistics with centrality summaries
//! - Batch experiments (threshold sweep and diffuser) written as CSV

pub mod adapters;
pub mod analysis;
pub mod cli;
pub mod error;
pub mod export;
pub mod game;
pub mod graph;
pub mod pipeline;
pub mod types;

pub use adapters::{DatasetSpec, WeightMode, read_edge_list};
pub use analysis::{MetricSummary, RunOutcome, Statistics, StatisticsRecord};
pub use error::{Error, Result};
pub use export::{StatisticsWriter, write_thresholds};
pub use game::{
    GameContext, GameKind, RoundSummary, SeedConfiguration, SeedSelectionGame,
    ThresholdConfiguration, ThresholdSelectionGame,
};
pub use graph::{Spread, ThresholdPolicy, WeightedGraph};
pub use pipeline::{Experiment, ExperimentConfig, ExperimentKind};
pub use types::{Centrality, DiffuserMode, Edge, NodeId, NodeRole, NodeSet};
