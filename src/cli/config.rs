//! Argument groups shared by CLI commands

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::{DatasetSpec, read_ranking},
    graph::{RandomDistribution, ThresholdPolicy},
};

/// Options every command sees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonConfig {
    /// Whether to show progress bars
    pub progress: bool,

    /// Verbose output
    pub verbose: bool,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            progress: true,
            verbose: false,
        }
    }
}

/// Network to load
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Edge list file (`from to [weight]` per line)
    pub edges: PathBuf,

    /// Treat edges as directed
    #[arg(long)]
    pub directed: bool,

    /// Read a weight column
    #[arg(long)]
    pub weighted: bool,

    /// Read the weight column but use weight 1
    #[arg(long, requires = "weighted")]
    pub ignore_weights: bool,

    /// PageRank file (`id,score` with header)
    #[arg(long)]
    pub pagerank: Option<PathBuf>,

    /// Betweenness file (`id,score` with header)
    #[arg(long)]
    pub betweenness: Option<PathBuf>,
}

impl DatasetArgs {
    pub fn to_spec(&self) -> DatasetSpec {
        let name = self
            .edges
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "network".to_string());
        DatasetSpec {
            name,
            edges: self.edges.clone(),
            directed: self.directed,
            weighted: self.weighted,
            ignore_weights: self.ignore_weights,
            pagerank: self.pagerank.clone(),
            betweenness: self.betweenness.clone(),
        }
    }
}

/// How thresholds are assigned before the game
#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    /// Fixed factor applied to every node's incoming weight
    #[arg(long, default_value_t = 0.5, conflicts_with_all = ["distribution", "ranking"])]
    pub factor: f64,

    /// Random factor distribution (random_uniform, random_uniform_0-0.5,
    /// random_uniform_0.5-1, random_normal)
    #[arg(long, conflicts_with = "ranking")]
    pub distribution: Option<RandomDistribution>,

    /// Ranking file (`id,score` with header) giving a factor per node
    #[arg(long)]
    pub ranking: Option<PathBuf>,

    /// Use `1 - score` for ranked factors
    #[arg(long, requires = "ranking")]
    pub invert: bool,
}

impl ThresholdArgs {
    pub fn policy(&self) -> Result<ThresholdPolicy> {
        if let Some(path) = &self.ranking {
            let scores = read_ranking(path)
                .map_err(|e| anyhow!("Failed to read ranking {}: {e}", path.display()))?;
            return Ok(ThresholdPolicy::Ranked {
                scores,
                invert: self.invert,
            });
        }
        Ok(match self.distribution {
            Some(distribution) => ThresholdPolicy::Random(distribution),
            None => ThresholdPolicy::Fixed(self.factor),
        })
    }
}
