//! Weighted networks and linear-threshold diffusion
//!
//! This module provides:
//! - [`WeightedGraph`]: adjacency, thresholds and imported centralities
//! - Threshold assignment policies (fixed, random, ranked import)
//! - Breadth-first linear-threshold spread computation
//! - A row-normalized stochastic view of a graph

pub mod diffusion;
pub mod network;
pub mod stochastic;
pub mod thresholds;

pub use diffusion::Spread;
pub use network::WeightedGraph;
pub use thresholds::{AssignmentReport, RandomDistribution, ThresholdPolicy};
