//! Threshold selection game
//!
//! A single diffuser sets the threshold of every player node, either to keep
//! the target set covered from a fixed initial set (cooperative) or to keep it
//! uncovered (malicious). Assigning threshold `t` is worth `+t` when the
//! diffuser's goal holds and `-t` otherwise, so the best response is the
//! extreme threshold on the right side of the coverage boundary.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    context::GameContext,
    dynamics::{RoundSummary, run_rounds},
    profile::StrategyProfile,
};
use crate::{
    Error, Result,
    graph::WeightedGraph,
    types::{DiffuserMode, NodeId},
};

/// Starting thresholds of the player nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdConfiguration {
    /// Threshold 1, the easiest to influence
    #[default]
    Empty,
    /// Threshold equal to the in-degree, the hardest to influence
    Complete,
    /// Uniform in `[1, in_degree]`
    Random,
    /// Keep the graph's current thresholds, rounded
    Current,
}

impl ThresholdConfiguration {
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdConfiguration::Empty => "empty",
            ThresholdConfiguration::Complete => "complete",
            ThresholdConfiguration::Random => "random",
            ThresholdConfiguration::Current => "current",
        }
    }
}

impl fmt::Display for ThresholdConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ThresholdConfiguration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(ThresholdConfiguration::Empty),
            "complete" => Ok(ThresholdConfiguration::Complete),
            "random" => Ok(ThresholdConfiguration::Random),
            "current" => Ok(ThresholdConfiguration::Current),
            _ => Err(Error::ParseOption {
                kind: "threshold configuration".to_string(),
                input: s.to_string(),
                expected: "empty, complete, random, current".to_string(),
            }),
        }
    }
}

/// Best-response dynamics over per-node threshold choices
pub struct ThresholdSelectionGame<'a> {
    graph: &'a mut WeightedGraph,
    context: &'a mut GameContext,
    mode: DiffuserMode,
    players: Vec<NodeId>,
    profile: StrategyProfile,
}

impl<'a> ThresholdSelectionGame<'a> {
    /// Create a game over the player nodes of `context`.
    ///
    /// The starting profile mirrors the graph's current thresholds; call
    /// [`ThresholdSelectionGame::initialize`] to overwrite them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the context and graph disagree on
    /// the node count.
    pub fn new(
        graph: &'a mut WeightedGraph,
        context: &'a mut GameContext,
        mode: DiffuserMode,
    ) -> Result<Self> {
        if context.node_count() != graph.node_count() {
            return Err(Error::SizeMismatch {
                context: context.node_count(),
                graph: graph.node_count(),
            });
        }

        let players = context.players();
        let profile = players
            .iter()
            .map(|&node| (node, rounded(graph.threshold(node))))
            .collect();

        Ok(Self {
            graph,
            context,
            mode,
            players,
            profile,
        })
    }

    /// Reset every player's threshold, in the profile and in the graph.
    pub fn initialize(&mut self, configuration: ThresholdConfiguration) {
        for &player in &self.players {
            let cap = self.cap(player);
            let threshold = match configuration {
                ThresholdConfiguration::Empty => 1,
                ThresholdConfiguration::Complete => cap,
                ThresholdConfiguration::Random => self.context.rng_mut().random_range(1..=cap),
                ThresholdConfiguration::Current => rounded(self.graph.threshold(player)),
            };
            self.profile.set(player, threshold);
            self.graph.set_threshold(player, f64::from(threshold));
        }
    }

    pub fn mode(&self) -> DiffuserMode {
        self.mode
    }

    /// Player nodes in update order
    pub fn players(&self) -> &[NodeId] {
        &self.players
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    /// Largest meaningful threshold of a node: its in-degree, at least 1
    pub fn cap(&self, node: NodeId) -> u32 {
        u32::try_from(self.graph.in_degree(node).max(1)).unwrap_or(u32::MAX)
    }

    /// Whether diffusion from the initial set reaches every target
    pub fn target_covered(&self) -> bool {
        self.graph
            .covers(self.context.initial_set(), self.context.target_set())
    }

    /// Utility of the diffuser for `player`'s current threshold
    pub fn utility(&self, player: NodeId) -> i64 {
        let threshold = self
            .profile
            .get(player)
            .unwrap_or_else(|| rounded(self.graph.threshold(player)));
        let value = i64::from(threshold);
        if self.mode.goal_holds(self.target_covered()) {
            value
        } else {
            -value
        }
    }

    fn try_threshold(&mut self, player: NodeId, threshold: u32) -> bool {
        self.graph.set_threshold(player, f64::from(threshold));
        self.target_covered()
    }

    /// Boundary threshold for `player`, with every other threshold fixed.
    ///
    /// Malicious: from the in-degree downwards, the smallest threshold that
    /// still keeps the targets uncovered (the in-degree itself if coverage
    /// already holds there). Cooperative: from 1 upwards, the largest
    /// threshold below the in-degree that still covers the targets (1 if
    /// coverage fails there or the in-degree is at most 2).
    ///
    /// Each trial reruns the full diffusion. The player's threshold is
    /// restored before returning.
    pub fn best_response(&mut self, player: NodeId) -> u32 {
        let original = self.graph.threshold(player);
        let cap = self.cap(player);

        let best = match self.mode {
            DiffuserMode::Malicious => {
                let mut best = cap;
                if !self.try_threshold(player, cap) {
                    for threshold in (1..cap).rev() {
                        if self.try_threshold(player, threshold) {
                            break;
                        }
                        best = threshold;
                    }
                }
                best
            }
            DiffuserMode::Cooperative => {
                let mut best = 1;
                if self.try_threshold(player, 1) {
                    for threshold in 2..cap {
                        if !self.try_threshold(player, threshold) {
                            break;
                        }
                        best = threshold;
                    }
                }
                best
            }
        };

        self.graph.set_threshold(player, original);
        best
    }

    /// Whether every player already plays its boundary threshold
    pub fn is_equilibrium(&mut self) -> bool {
        let players = self.players.clone();
        players
            .into_iter()
            .all(|player| self.profile.get(player) == Some(self.best_response(player)))
    }

    /// Run round-robin best responses in ascending node order. Each chosen
    /// threshold is written to the graph at once, so later players in the
    /// same round see it.
    ///
    /// The graph keeps the final thresholds and one diffusion from the
    /// initial set fills the context's final influence.
    pub fn game_dynamics(&mut self, max_rounds: usize) -> Result<RoundSummary> {
        let players = self.players.clone();
        let summary = run_rounds(&players, max_rounds, |player| {
            let response = self.best_response(player);
            self.graph.set_threshold(player, f64::from(response));
            Ok(self.profile.set(player, response))
        })?;

        let influence = self.graph.expand(self.context.initial_set());
        self.context.set_final_influence(influence);
        Ok(summary)
    }
}

fn rounded(threshold: f64) -> u32 {
    if threshold.is_finite() && threshold >= 1.0 {
        threshold.round().min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}
