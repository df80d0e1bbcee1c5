//! Row-normalized view of a network

use super::WeightedGraph;
use crate::types::NodeId;

fn normalized(rows: &[Vec<(NodeId, f64)>]) -> Vec<Vec<(NodeId, f64)>> {
    rows.iter()
        .map(|row| {
            let total: f64 = row.iter().map(|&(_, w)| w).sum();
            row.iter()
                .map(|&(node, w)| (node, if total > 0.0 { w / total } else { 0.0 }))
                .collect()
        })
        .collect()
}

impl WeightedGraph {
    /// Copy of the graph whose outgoing (and incoming) weights form a
    /// probability distribution per node. Rows with zero total weight become
    /// all zeros. Every threshold is reset to 1.
    pub fn stochastic(&self) -> WeightedGraph {
        let adjacency = normalized(&self.adjacency);
        let predecessors = if self.directed {
            normalized(&self.predecessors)
        } else {
            Vec::new()
        };
        let base_weight = (0..self.node_count())
            .map(|node| {
                let incoming = if self.directed {
                    &predecessors[node]
                } else {
                    &adjacency[node]
                };
                incoming.iter().map(|&(_, w)| w).sum()
            })
            .collect();

        WeightedGraph {
            directed: self.directed,
            edge_count: self.edge_count,
            mapping: self.mapping.clone(),
            index: self.index.clone(),
            adjacency,
            predecessors,
            base_weight,
            threshold: vec![1.0; self.node_count()],
            pagerank: self.pagerank.clone(),
            betweenness: self.betweenness.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{graph::WeightedGraph, types::Edge};

    #[test]
    fn outgoing_weights_sum_to_one() {
        let edges = [Edge::new(0, 1, 3.0), Edge::new(0, 2, 1.0), Edge::unit(1, 2)];
        let graph = WeightedGraph::from_edge_list(&edges, true).unwrap();
        let stochastic = graph.stochastic();

        let total: f64 = stochastic.neighbors(0).iter().map(|&(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((stochastic.neighbors(0)[0].1 - 0.75).abs() < 1e-12);
        assert!(stochastic.neighbors(2).is_empty());
        assert_eq!(stochastic.thresholds(), &[1.0, 1.0, 1.0]);
        assert_eq!(stochastic.in_degree(2), graph.in_degree(2));
    }

    #[test]
    fn zero_weight_rows_stay_zero() {
        let edges = [Edge::new(0, 1, 0.0)];
        let graph = WeightedGraph::from_edge_list(&edges, false).unwrap();
        let stochastic = graph.stochastic();
        assert_eq!(stochastic.neighbors(0), &[(1, 0.0)]);
    }
}
