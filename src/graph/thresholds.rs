//! Threshold assignment policies
//!
//! Every policy derives a factor in `[0, 1]` per node and sets
//! `threshold = floor(base_weight * factor) + 1`, so a node always needs at
//! least one unit of influence and reassignment never compounds.

use std::{fmt, str::FromStr};

use rand::{Rng, distr::Uniform};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::WeightedGraph;
use crate::{Error, Result};

/// Random factor distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomDistribution {
    /// Uniform over `[0, 1)`
    Uniform,
    /// Uniform over `[0, 0.5)`
    UniformLow,
    /// Uniform over `[0.5, 1)`
    UniformHigh,
    /// Normal with mean 0.5 and deviation 1/6, clipped to `[0, 1]`
    Normal,
}

impl RandomDistribution {
    pub const ALL: [RandomDistribution; 4] = [
        RandomDistribution::Uniform,
        RandomDistribution::UniformLow,
        RandomDistribution::UniformHigh,
        RandomDistribution::Normal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RandomDistribution::Uniform => "random_uniform",
            RandomDistribution::UniformLow => "random_uniform_0-0.5",
            RandomDistribution::UniformHigh => "random_uniform_0.5-1",
            RandomDistribution::Normal => "random_normal",
        }
    }
}

impl fmt::Display for RandomDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RandomDistribution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RandomDistribution::ALL
            .into_iter()
            .find(|dist| dist.label() == s)
            .ok_or_else(|| Error::ParseOption {
                kind: "threshold distribution".to_string(),
                input: s.to_string(),
                expected: RandomDistribution::ALL
                    .iter()
                    .map(|d| d.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// How thresholds are assigned to a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdPolicy {
    /// Same factor for every node
    Fixed(f64),
    /// Independent random factor per node
    Random(RandomDistribution),
    /// Factor read from an external ranking of `(external id, score)` pairs
    Ranked {
        scores: Vec<(i64, f64)>,
        /// Use `1 - score` instead of the score
        invert: bool,
    },
}

/// Summary of a threshold assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Nodes whose threshold was derived from the policy
    pub assigned: usize,
    /// Ranked entries whose identifier is not in the graph
    pub unmapped: usize,
}

fn scaled(base: f64, factor: f64) -> f64 {
    (base * factor).floor() + 1.0
}

fn check_factor(value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidFactor { value })
    }
}

impl WeightedGraph {
    /// Assign thresholds according to `policy`.
    ///
    /// Random policies draw from `rng`; the other policies ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFactor`] if a fixed factor or ranked score lies
    /// outside `[0, 1]`.
    pub fn assign_thresholds<R: Rng + ?Sized>(
        &mut self,
        policy: &ThresholdPolicy,
        rng: &mut R,
    ) -> Result<AssignmentReport> {
        match policy {
            ThresholdPolicy::Fixed(factor) => {
                self.assign_fixed(*factor)?;
                Ok(AssignmentReport {
                    assigned: self.node_count(),
                    unmapped: 0,
                })
            }
            ThresholdPolicy::Random(distribution) => {
                self.assign_random(*distribution, rng);
                Ok(AssignmentReport {
                    assigned: self.node_count(),
                    unmapped: 0,
                })
            }
            ThresholdPolicy::Ranked { scores, invert } => self.assign_ranked(scores, *invert),
        }
    }

    /// Assign `floor(base_weight * factor) + 1` to every node.
    pub fn assign_fixed(&mut self, factor: f64) -> Result<()> {
        check_factor(factor)?;
        for (threshold, &base) in self.threshold.iter_mut().zip(&self.base_weight) {
            *threshold = scaled(base, factor);
        }
        Ok(())
    }

    fn assign_random<R: Rng + ?Sized>(&mut self, distribution: RandomDistribution, rng: &mut R) {
        let factors: Vec<f64> = match distribution {
            RandomDistribution::Uniform => sample_uniform(rng, 0.0, 1.0, self.node_count()),
            RandomDistribution::UniformLow => sample_uniform(rng, 0.0, 0.5, self.node_count()),
            RandomDistribution::UniformHigh => sample_uniform(rng, 0.5, 1.0, self.node_count()),
            RandomDistribution::Normal => match Normal::new(0.5_f64, 1.0 / 6.0) {
                Ok(normal) => (0..self.node_count())
                    .map(|_| normal.sample(rng).clamp(0.0, 1.0))
                    .collect(),
                Err(_) => vec![0.5; self.node_count()],
            },
        };

        for ((threshold, &base), factor) in self
            .threshold
            .iter_mut()
            .zip(&self.base_weight)
            .zip(factors)
        {
            *threshold = scaled(base, factor);
        }
    }

    fn assign_ranked(&mut self, scores: &[(i64, f64)], invert: bool) -> Result<AssignmentReport> {
        let mut factors = vec![1.0; self.node_count()];
        let mut report = AssignmentReport::default();

        for &(external, score) in scores {
            let score = check_factor(score)?;
            match self.node_index(external) {
                Some(node) => {
                    factors[node] = if invert { 1.0 - score } else { score };
                    report.assigned += 1;
                }
                None => {
                    warn!(node = external, "ranked node not found in graph, skipping");
                    report.unmapped += 1;
                }
            }
        }

        debug!(
            assigned = report.assigned,
            unranked = self.node_count().saturating_sub(report.assigned),
            "ranked thresholds assigned"
        );

        for ((threshold, &base), factor) in self
            .threshold
            .iter_mut()
            .zip(&self.base_weight)
            .zip(factors)
        {
            *threshold = scaled(base, factor);
        }
        Ok(report)
    }
}

fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64, count: usize) -> Vec<f64> {
    match Uniform::new(low, high) {
        Ok(dist) => (0..count).map(|_| dist.sample(rng)).collect(),
        Err(_) => vec![low; count],
    }
}
