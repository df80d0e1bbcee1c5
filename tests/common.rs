//! Common fixtures for the influence games test suite.
//!
//! Small hand-built networks plus proptest strategies for random ones.

#![allow(dead_code)]

use influence_games::{Edge, WeightedGraph};
use proptest::prelude::*;

/// 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3 with unit thresholds.
pub fn diamond() -> WeightedGraph {
    let edges = [
        Edge::unit(0, 1),
        Edge::unit(0, 2),
        Edge::unit(1, 3),
        Edge::unit(2, 3),
    ];
    with_unit_thresholds(&edges)
}

/// Directed path 0 -> 1 -> ... -> len-1 with unit thresholds.
pub fn path(len: i64) -> WeightedGraph {
    let edges: Vec<Edge> = (0..len - 1).map(|i| Edge::unit(i, i + 1)).collect();
    with_unit_thresholds(&edges)
}

/// Directed graph whose thresholds are all 1.
pub fn with_unit_thresholds(edges: &[Edge]) -> WeightedGraph {
    let mut graph = WeightedGraph::from_edge_list(edges, true).unwrap();
    let ones = vec![1.0; graph.node_count()];
    graph.set_thresholds(&ones).unwrap();
    graph
}

/// Random edge lists over at most `max_nodes` ids, weights in 1..=4.
pub fn edge_lists(max_nodes: i64, max_edges: usize) -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec((0..max_nodes, 0..max_nodes, 1u8..=4), 1..max_edges).prop_map(|raw| {
        raw.into_iter()
            .map(|(from, to, weight)| Edge::new(from, to, f64::from(weight)))
            .collect()
    })
}

/// Random directed graph with fixed-factor thresholds.
pub fn graphs(max_nodes: i64, max_edges: usize) -> impl Strategy<Value = WeightedGraph> {
    (edge_lists(max_nodes, max_edges), 0.0..=1.0_f64).prop_map(|(edges, factor)| {
        let mut graph = WeightedGraph::from_edge_list(&edges, true).unwrap();
        graph.assign_fixed(factor).unwrap();
        graph
    })
}

/// Write `content` to a fresh file inside `dir`.
pub fn write_file(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
