//! Weighted network with per-node susceptibility thresholds

use std::collections::HashMap;

use tracing::debug;

use crate::{
    Error, Result,
    types::{Centrality, Edge, NodeId},
};

/// Weighted directed or undirected network.
///
/// Nodes are renumbered to dense indices in the order they first appear in
/// the edge stream. The adjacency is fixed at construction; only the
/// thresholds change afterwards.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    pub(crate) directed: bool,
    pub(crate) edge_count: usize,
    pub(crate) mapping: Vec<i64>,
    pub(crate) index: HashMap<i64, NodeId>,
    pub(crate) adjacency: Vec<Vec<(NodeId, f64)>>,
    pub(crate) predecessors: Vec<Vec<(NodeId, f64)>>,
    pub(crate) base_weight: Vec<f64>,
    pub(crate) threshold: Vec<f64>,
    pub(crate) pagerank: Vec<f64>,
    pub(crate) betweenness: Vec<f64>,
}

impl WeightedGraph {
    /// Build a graph from an edge stream and two centrality vectors aligned
    /// with first-seen node order.
    ///
    /// Empty centrality vectors are treated as all zeros. Every node's
    /// threshold starts at its base weight (sum of incoming edge weights).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeight`] for negative or non-finite weights and
    /// [`Error::CentralityLength`] when a non-empty centrality vector does not
    /// match the node count.
    pub fn from_edges(
        edges: &[Edge],
        pagerank: Vec<f64>,
        betweenness: Vec<f64>,
        directed: bool,
    ) -> Result<Self> {
        let mut graph = WeightedGraph {
            directed,
            edge_count: edges.len(),
            mapping: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            predecessors: Vec::new(),
            base_weight: Vec::new(),
            threshold: Vec::new(),
            pagerank: Vec::new(),
            betweenness: Vec::new(),
        };

        for edge in edges {
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(Error::InvalidWeight {
                    from: edge.from,
                    to: edge.to,
                    weight: edge.weight,
                });
            }
            if edge.from == edge.to {
                debug!(node = edge.from, "self-loop kept in adjacency");
            }

            let v = graph.intern(edge.from);
            let u = graph.intern(edge.to);

            graph.adjacency[v].push((u, edge.weight));
            graph.base_weight[u] += edge.weight;

            if directed {
                graph.predecessors[u].push((v, edge.weight));
            } else {
                graph.adjacency[u].push((v, edge.weight));
                graph.base_weight[v] += edge.weight;
            }
        }

        graph.threshold = graph.base_weight.clone();
        let n = graph.node_count();
        graph.pagerank = aligned(Centrality::PageRank, pagerank, n)?;
        graph.betweenness = aligned(Centrality::Betweenness, betweenness, n)?;

        Ok(graph)
    }

    /// Build a graph without centrality scores.
    pub fn from_edge_list(edges: &[Edge], directed: bool) -> Result<Self> {
        Self::from_edges(edges, Vec::new(), Vec::new(), directed)
    }

    fn intern(&mut self, external: i64) -> NodeId {
        if let Some(&node) = self.index.get(&external) {
            return node;
        }
        let node = self.mapping.len();
        self.mapping.push(external);
        self.index.insert(external, node);
        self.adjacency.push(Vec::new());
        if self.directed {
            self.predecessors.push(Vec::new());
        }
        self.base_weight.push(0.0);
        node
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.mapping.len()
    }

    /// Number of edges in the source stream
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Dense index of an external identifier
    pub fn node_index(&self, external: i64) -> Option<NodeId> {
        self.index.get(&external).copied()
    }

    /// External identifier of a dense index
    pub fn external_id(&self, node: NodeId) -> i64 {
        self.mapping[node]
    }

    /// External identifiers in dense index order
    pub fn mapping(&self) -> &[i64] {
        &self.mapping
    }

    /// Outgoing `(neighbor, weight)` pairs of a node
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, f64)] {
        &self.adjacency[node]
    }

    /// Incoming `(neighbor, weight)` pairs of a node
    pub fn predecessors(&self, node: NodeId) -> &[(NodeId, f64)] {
        if self.directed {
            &self.predecessors[node]
        } else {
            &self.adjacency[node]
        }
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.predecessors(node).len()
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.adjacency[node].len()
    }

    /// Sum of incoming edge weights, the reference for threshold assignment
    pub fn base_weight(&self, node: NodeId) -> f64 {
        self.base_weight[node]
    }

    pub fn threshold(&self, node: NodeId) -> f64 {
        self.threshold[node]
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.threshold
    }

    /// Overwrite one node's threshold
    pub fn set_threshold(&mut self, node: NodeId, value: f64) {
        self.threshold[node] = value;
    }

    /// Overwrite every threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThresholdLength`] if the slice length differs from the
    /// node count.
    pub fn set_thresholds(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.node_count() {
            return Err(Error::ThresholdLength {
                expected: self.node_count(),
                got: values.len(),
            });
        }
        self.threshold.copy_from_slice(values);
        Ok(())
    }

    pub fn pagerank(&self, node: NodeId) -> f64 {
        self.pagerank[node]
    }

    pub fn betweenness(&self, node: NodeId) -> f64 {
        self.betweenness[node]
    }

    /// Value of a metric for a node. Degree is the in-degree when
    /// `incoming` is set and the out-degree otherwise.
    pub fn metric(&self, node: NodeId, metric: Centrality, incoming: bool) -> f64 {
        match metric {
            Centrality::Degree if incoming => self.in_degree(node) as f64,
            Centrality::Degree => self.out_degree(node) as f64,
            Centrality::PageRank => self.pagerank[node],
            Centrality::Betweenness => self.betweenness[node],
        }
    }

    /// Nodes without outgoing edges
    pub fn dangling_nodes(&self) -> Vec<NodeId> {
        (0..self.node_count())
            .filter(|&node| self.adjacency[node].is_empty())
            .collect()
    }
}

fn aligned(metric: Centrality, values: Vec<f64>, nodes: usize) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Ok(vec![0.0; nodes]);
    }
    if values.len() != nodes {
        return Err(Error::CentralityLength {
            metric: format!("{metric:?}"),
            expected: nodes,
            got: values.len(),
        });
    }
    Ok(values)
}
