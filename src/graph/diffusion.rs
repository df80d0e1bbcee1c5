//! Linear-threshold influence diffusion
//!
//! Starting from a seed set, every active node pushes `w * in_degree(u)` to
//! each inactive out-neighbor `u`. A neighbor whose accumulated influence
//! reaches its threshold becomes active and is enqueued exactly once. Each
//! call starts from a fresh activation state.

use std::collections::VecDeque;

use super::WeightedGraph;
use crate::types::{NodeId, NodeSet};

/// Detailed result of one diffusion run
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    /// Active nodes in activation order, seeds first
    pub order: Vec<NodeId>,
    /// Spread level per node: 0 for seeds, parent level + 1 otherwise
    pub levels: Vec<Option<u32>>,
}

impl Spread {
    /// Set of active nodes
    pub fn influenced(&self) -> NodeSet {
        self.order.iter().copied().collect()
    }

    /// Number of active nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.levels[node].is_some()
    }

    /// Deepest spread level reached
    pub fn depth(&self) -> u32 {
        self.levels.iter().flatten().copied().max().unwrap_or(0)
    }
}

impl WeightedGraph {
    /// Run the diffusion and keep activation order and levels.
    ///
    /// Seeds must be valid node indices.
    pub fn spread<'a, I>(&self, seeds: I) -> Spread
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let n = self.node_count();
        let mut influence = vec![0.0_f64; n];
        let mut levels: Vec<Option<u32>> = vec![None; n];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        for &seed in seeds {
            debug_assert!(seed < n, "seed {seed} out of range");
            if levels[seed].is_none() {
                levels[seed] = Some(0);
                order.push(seed);
                queue.push_back(seed);
            }
        }

        while let Some(v) = queue.pop_front() {
            let level = levels[v].unwrap_or(0) + 1;
            for &(u, w) in &self.adjacency[v] {
                if levels[u].is_some() {
                    continue;
                }
                influence[u] += w * self.in_degree(u) as f64;
                if influence[u] >= self.threshold[u] {
                    levels[u] = Some(level);
                    order.push(u);
                    queue.push_back(u);
                }
            }
        }

        Spread { order, levels }
    }

    /// Maximal set reachable from `seeds` under the linear-threshold rule.
    pub fn expand<'a, I>(&self, seeds: I) -> NodeSet
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        self.spread(seeds).influenced()
    }

    /// Whether diffusion from `seeds` reaches every node of `targets`
    pub fn covers<'a, I>(&self, seeds: I, targets: &NodeSet) -> bool
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let spread = self.spread(seeds);
        targets.iter().all(|&node| spread.is_active(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, sorted};

    fn diamond() -> WeightedGraph {
        let edges = [
            Edge::unit(0, 1),
            Edge::unit(0, 2),
            Edge::unit(1, 3),
            Edge::unit(2, 3),
        ];
        let mut graph = WeightedGraph::from_edge_list(&edges, true).unwrap();
        graph.set_thresholds(&[1.0; 4]).unwrap();
        graph
    }

    #[test]
    fn diamond_reaches_every_node() {
        let graph = diamond();
        let spread = graph.spread(&[0]);
        assert_eq!(sorted(&spread.influenced()), vec![0, 1, 2, 3]);
        assert_eq!(spread.levels[0], Some(0));
        assert_eq!(spread.levels[1], Some(1));
        assert_eq!(spread.levels[3], Some(2));
        assert_eq!(spread.depth(), 2);
    }

    #[test]
    fn accumulation_is_scaled_by_in_degree() {
        // node 3 has in-degree 2, so one active parent contributes 1 * 2
        let mut graph = diamond();
        graph.set_threshold(3, 2.0);
        assert!(graph.expand(&[1]).contains(&3));

        graph.set_threshold(3, 2.5);
        assert!(!graph.expand(&[1]).contains(&3));
        assert!(graph.expand(&[1, 2]).contains(&3));
    }

    #[test]
    fn empty_seed_set_spreads_nowhere() {
        let graph = diamond();
        assert!(graph.spread(std::iter::empty()).is_empty());
    }

    #[test]
    fn duplicate_seeds_are_enqueued_once() {
        let graph = diamond();
        let spread = graph.spread(&[0, 0, 1]);
        assert_eq!(spread.len(), 4);
        assert_eq!(spread.order[..2], [0, 1]);
    }

    #[test]
    fn covers_checks_whole_target_set() {
        let mut graph = diamond();
        graph.set_threshold(3, 10.0);
        let targets: NodeSet = [1, 3].into_iter().collect();
        assert!(!graph.covers(&[0], &targets));
        graph.set_threshold(3, 1.0);
        assert!(graph.covers(&[0], &targets));
    }

    #[test]
    fn undirected_spread_flows_both_ways() {
        let edges = [Edge::unit(0, 1), Edge::unit(1, 2)];
        let mut graph = WeightedGraph::from_edge_list(&edges, false).unwrap();
        graph.set_thresholds(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(sorted(&graph.expand(&[2])), vec![0, 1, 2]);
    }
}
