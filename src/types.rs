//! Core domain types shared by the graph, the games and the statistics.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Dense node index in `[0, N)`.
pub type NodeId = usize;

/// Set of dense node indices.
pub type NodeSet = HashSet<NodeId>;

/// A weighted edge between two external node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: i64,
    pub to: i64,
    pub weight: f64,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: i64, to: i64, weight: f64) -> Self {
        Self { from, to, weight }
    }

    /// Create an edge with unit weight.
    pub fn unit(from: i64, to: i64) -> Self {
        Self::new(from, to, 1.0)
    }
}

/// The role a node plays in a game. Every node holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeRole {
    /// Node whose coverage is the objective of the game
    Target,
    /// Node in the seed set of the diffusion
    Initial,
    /// Strategic agent
    #[default]
    Player,
}

impl NodeRole {
    /// Short label
    pub fn label(&self) -> &'static str {
        match self {
            NodeRole::Target => "target",
            NodeRole::Initial => "initial",
            NodeRole::Player => "player",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Node-level metric tracked by the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Centrality {
    Degree,
    PageRank,
    Betweenness,
}

impl Centrality {
    /// All metrics, in output column order.
    pub const ALL: [Centrality; 3] = [
        Centrality::Degree,
        Centrality::PageRank,
        Centrality::Betweenness,
    ];

    /// Column prefix used in the statistics CSV
    pub fn column(&self) -> &'static str {
        match self {
            Centrality::Degree => "Degree",
            Centrality::PageRank => "Page",
            Centrality::Betweenness => "Btw",
        }
    }

    /// Position within [`Centrality::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Centrality::Degree => 0,
            Centrality::PageRank => 1,
            Centrality::Betweenness => 2,
        }
    }
}

/// Objective of the diffuser in the threshold selection game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffuserMode {
    /// The diffuser wants the whole target set influenced
    Cooperative,
    /// The diffuser wants the target set left uncovered
    #[default]
    Malicious,
}

impl DiffuserMode {
    /// Short label
    pub fn label(&self) -> &'static str {
        match self {
            DiffuserMode::Cooperative => "cooperative",
            DiffuserMode::Malicious => "malicious",
        }
    }

    /// Whether the diffuser's goal holds given target coverage
    pub fn goal_holds(&self, target_covered: bool) -> bool {
        match self {
            DiffuserMode::Cooperative => target_covered,
            DiffuserMode::Malicious => !target_covered,
        }
    }
}

impl FromStr for DiffuserMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cooperative" | "coop" => Ok(DiffuserMode::Cooperative),
            "malicious" => Ok(DiffuserMode::Malicious),
            _ => Err(crate::Error::ParseOption {
                kind: "diffuser mode".to_string(),
                input: s.to_string(),
                expected: "cooperative, malicious".to_string(),
            }),
        }
    }
}

/// Number of elements of `a` that are also in `b`.
pub fn intersection_size(a: &NodeSet, b: &NodeSet) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|node| large.contains(node)).count()
}

/// Whether every element of `a` is in `b`.
pub fn is_subset(a: &NodeSet, b: &NodeSet) -> bool {
    a.len() <= b.len() && a.iter().all(|node| b.contains(node))
}

/// Sorted copy of a node set, for stable output.
pub fn sorted(set: &NodeSet) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> = set.iter().copied().collect();
    nodes.sort_unstable();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_counts_shared_nodes() {
        let a: NodeSet = [1, 2, 3].into_iter().collect();
        let b: NodeSet = [2, 3, 4, 5].into_iter().collect();
        assert_eq!(intersection_size(&a, &b), 2);
        assert_eq!(intersection_size(&b, &a), 2);
    }

    #[test]
    fn empty_set_is_subset_of_anything() {
        let empty = NodeSet::new();
        let b: NodeSet = [7].into_iter().collect();
        assert!(is_subset(&empty, &b));
        assert!(is_subset(&empty, &empty));
        assert!(!is_subset(&b, &empty));
    }

    #[test]
    fn diffuser_goal_flips_between_modes() {
        assert!(DiffuserMode::Cooperative.goal_holds(true));
        assert!(!DiffuserMode::Cooperative.goal_holds(false));
        assert!(DiffuserMode::Malicious.goal_holds(false));
        assert!(!DiffuserMode::Malicious.goal_holds(true));
    }

    #[test]
    fn diffuser_mode_parses_labels() {
        assert_eq!(
            "Cooperative".parse::<DiffuserMode>().unwrap(),
            DiffuserMode::Cooperative
        );
        assert!("neutral".parse::<DiffuserMode>().is_err());
    }
}
