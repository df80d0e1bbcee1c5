//! CLI subcommands

pub mod experiment;
pub mod seed_game;
pub mod threshold_game;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::{
    cli::output::{format_nodes, print_kv, print_section, print_set},
    game::{GameContext, GameKind, RoundSummary},
    graph::WeightedGraph,
    types::{NodeId, intersection_size},
};

/// Map external ids given on the command line to graph nodes
pub(crate) fn resolve_nodes(graph: &WeightedGraph, ids: &[i64], flag: &str) -> Result<Vec<NodeId>> {
    ids.iter()
        .map(|&id| {
            graph
                .node_index(id)
                .ok_or_else(|| anyhow!("Node {id} given to {flag} is not in the network"))
        })
        .collect()
}

/// Outcome of a single game, as printed and saved by the game commands
#[derive(Debug, Serialize)]
pub struct GameReport {
    pub game: GameKind,
    pub network: String,
    pub nodes: usize,
    pub edges: usize,
    pub rounds: usize,
    pub converged: bool,
    pub initial: Vec<i64>,
    pub targets: Vec<i64>,
    pub influenced: usize,
    pub target_coverage: f64,
}

impl GameReport {
    pub fn new(
        game: GameKind,
        network: &str,
        graph: &WeightedGraph,
        context: &GameContext,
        summary: RoundSummary,
    ) -> Self {
        let external = |nodes: &crate::types::NodeSet| {
            let mut ids: Vec<i64> = nodes.iter().map(|&n| graph.external_id(n)).collect();
            ids.sort_unstable();
            ids
        };
        let targets = context.target_set();
        let target_coverage = if targets.is_empty() {
            0.0
        } else {
            intersection_size(targets, context.final_influence()) as f64 / targets.len() as f64
        };

        Self {
            game,
            network: network.to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            rounds: summary.rounds,
            converged: summary.converged(),
            initial: external(context.initial_set()),
            targets: external(targets),
            influenced: context.final_influence().len(),
            target_coverage,
        }
    }

    pub fn print(&self, graph: &WeightedGraph, context: &GameContext) {
        print_section(&format!("{} on {}", self.game, self.network));
        print_kv("Nodes", &self.nodes.to_string());
        print_kv("Edges", &self.edges.to_string());
        print_kv(
            "Rounds",
            &format!(
                "{}{}",
                self.rounds,
                if self.converged { "" } else { " (round limit)" }
            ),
        );
        print_set("Initial set", context.initial_set(), self.nodes);
        print_set("Target set", context.target_set(), self.nodes);
        print_set("Influenced", context.final_influence(), self.nodes);
        print_kv(
            "Target coverage",
            &format!("{:.1}%", self.target_coverage * 100.0),
        );
        print_kv("Initial nodes", &format_nodes(graph, context.initial_set(), 20));
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
