//! Strategy profiles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{NodeId, NodeSet};

/// Action chosen by each player node.
///
/// Actions are `0`/`1` in the seed selection game and threshold values in
/// the threshold selection game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyProfile(BTreeMap<NodeId, u32>);

impl StrategyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<u32> {
        self.0.get(&node).copied()
    }

    /// Set a node's action, returning whether it changed
    pub fn set(&mut self, node: NodeId, action: u32) -> bool {
        self.0.insert(node, action) != Some(action)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(node, action)` pairs in ascending node order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.0.iter().map(|(&node, &action)| (node, action))
    }

    /// Nodes playing a non-zero action
    pub fn active(&self) -> NodeSet {
        self.iter()
            .filter(|&(_, action)| action != 0)
            .map(|(node, _)| node)
            .collect()
    }
}

impl FromIterator<(NodeId, u32)> for StrategyProfile {
    fn from_iter<T: IntoIterator<Item = (NodeId, u32)>>(iter: T) -> Self {
        StrategyProfile(iter.into_iter().collect())
    }
}
