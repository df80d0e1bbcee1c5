//! Node-role partition shared by both games
//!
//! A [`GameContext`] assigns every node exactly one [`NodeRole`] and keeps the
//! target and initial sets in step with that assignment. Games borrow the
//! context mutably while they run and publish their results into it.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Error, Result,
    types::{NodeId, NodeRole, NodeSet, sorted},
};

/// Seed of the internal generator when none is given
pub const DEFAULT_SEED: u64 = 2000;

/// Outcome of a proportion-based selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionReport {
    /// `floor(N * proportion)`
    pub requested: usize,
    /// Nodes actually given the role
    pub selected: usize,
}

impl SelectionReport {
    /// Whether role conflicts left the selection short of the request
    pub fn is_short(&self) -> bool {
        self.selected < self.requested
    }
}

/// Role partition plus the result sets of the last game
#[derive(Debug, Clone)]
pub struct GameContext {
    roles: Vec<NodeRole>,
    target_set: NodeSet,
    initial_set: NodeSet,
    final_influence: NodeSet,
    rng: StdRng,
}

impl GameContext {
    /// All `nodes` start as players; the internal generator uses
    /// [`DEFAULT_SEED`].
    pub fn new(nodes: usize) -> Self {
        Self::with_seed(nodes, DEFAULT_SEED)
    }

    pub fn with_seed(nodes: usize, seed: u64) -> Self {
        Self {
            roles: vec![NodeRole::Player; nodes],
            target_set: NodeSet::new(),
            initial_set: NodeSet::new(),
            final_influence: NodeSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a context from a complete role assignment.
    pub fn from_roles(roles: Vec<NodeRole>) -> Self {
        let mut context = Self::new(0);
        context.target_set = role_members(&roles, NodeRole::Target);
        context.initial_set = role_members(&roles, NodeRole::Initial);
        context.roles = roles;
        context
    }

    pub fn node_count(&self) -> usize {
        self.roles.len()
    }

    pub fn roles(&self) -> &[NodeRole] {
        &self.roles
    }

    pub fn role(&self, node: NodeId) -> NodeRole {
        self.roles[node]
    }

    pub fn target_set(&self) -> &NodeSet {
        &self.target_set
    }

    pub fn initial_set(&self) -> &NodeSet {
        &self.initial_set
    }

    /// Influence reached by the last finished game
    pub fn final_influence(&self) -> &NodeSet {
        &self.final_influence
    }

    /// Player nodes in ascending index order
    pub fn players(&self) -> Vec<NodeId> {
        (0..self.roles.len())
            .filter(|&node| self.roles[node] == NodeRole::Player)
            .collect()
    }

    /// Internal generator, for callers that want to reuse it
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Give `nodes` the target role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for out-of-range nodes and
    /// [`Error::RoleConflict`] for nodes that already are initial nodes. No
    /// role changes if an error is returned.
    pub fn select_target_nodes<I>(&mut self, nodes: I) -> Result<usize>
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.assign_explicit(nodes, NodeRole::Target)
    }

    /// Give `nodes` the initial role. See [`GameContext::select_target_nodes`].
    pub fn select_initial_nodes<I>(&mut self, nodes: I) -> Result<usize>
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.assign_explicit(nodes, NodeRole::Initial)
    }

    /// Sample `floor(N * proportion)` target nodes with the internal generator.
    pub fn select_target_proportion(&mut self, proportion: f64) -> Result<SelectionReport> {
        let mut rng = self.rng.clone();
        let report = self.assign_random(proportion, NodeRole::Target, &mut rng);
        self.rng = rng;
        report
    }

    /// Sample target nodes with a caller-supplied generator.
    pub fn select_target_proportion_with<R: Rng + ?Sized>(
        &mut self,
        proportion: f64,
        rng: &mut R,
    ) -> Result<SelectionReport> {
        self.assign_random(proportion, NodeRole::Target, rng)
    }

    /// Sample `floor(N * proportion)` initial nodes with the internal generator.
    pub fn select_initial_proportion(&mut self, proportion: f64) -> Result<SelectionReport> {
        let mut rng = self.rng.clone();
        let report = self.assign_random(proportion, NodeRole::Initial, &mut rng);
        self.rng = rng;
        report
    }

    /// Sample initial nodes with a caller-supplied generator.
    pub fn select_initial_proportion_with<R: Rng + ?Sized>(
        &mut self,
        proportion: f64,
        rng: &mut R,
    ) -> Result<SelectionReport> {
        self.assign_random(proportion, NodeRole::Initial, rng)
    }

    /// Whether the sets and the role array describe the same partition
    pub fn is_consistent(&self) -> bool {
        self.target_set.is_disjoint(&self.initial_set)
            && self.target_set == role_members(&self.roles, NodeRole::Target)
            && self.initial_set == role_members(&self.roles, NodeRole::Initial)
    }

    /// Demote every initial node back to player
    pub(crate) fn clear_initial_set(&mut self) {
        for &node in &self.initial_set {
            self.roles[node] = NodeRole::Player;
        }
        self.initial_set.clear();
    }

    /// Replace the initial set with `nodes`, which must not be targets
    pub(crate) fn replace_initial_set(&mut self, nodes: NodeSet) {
        self.clear_initial_set();
        for &node in &nodes {
            debug_assert_ne!(self.roles[node], NodeRole::Target);
            self.roles[node] = NodeRole::Initial;
        }
        self.initial_set = nodes;
    }

    pub(crate) fn set_final_influence(&mut self, influence: NodeSet) {
        self.final_influence = influence;
    }

    fn assign_explicit<I>(&mut self, nodes: I, role: NodeRole) -> Result<usize>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let nodes: Vec<NodeId> = nodes.into_iter().collect();
        for &node in &nodes {
            let existing = *self.roles.get(node).ok_or(Error::UnknownNode {
                node,
                nodes: self.roles.len(),
            })?;
            if existing != role && existing != NodeRole::Player {
                return Err(Error::RoleConflict {
                    node,
                    existing: existing.to_string(),
                    requested: role.to_string(),
                });
            }
        }

        let mut added = 0;
        for node in nodes {
            if self.insert(node, role) {
                added += 1;
            }
        }
        Ok(added)
    }

    fn assign_random<R: Rng + ?Sized>(
        &mut self,
        proportion: f64,
        role: NodeRole,
        rng: &mut R,
    ) -> Result<SelectionReport> {
        if !proportion.is_finite() || !(0.0..=1.0).contains(&proportion) {
            return Err(Error::InvalidProportion { value: proportion });
        }

        let n = self.roles.len();
        let requested = (n as f64 * proportion).floor() as usize;
        let mut nodes: Vec<NodeId> = (0..n).collect();
        nodes.shuffle(rng);

        let mut selected = 0;
        for node in nodes {
            if selected == requested {
                break;
            }
            if self.roles[node] == role {
                selected += 1;
            } else if self.roles[node] == NodeRole::Player {
                self.insert(node, role);
                selected += 1;
            }
        }

        let report = SelectionReport {
            requested,
            selected,
        };
        if report.is_short() {
            warn!(
                role = %role,
                requested,
                selected,
                "selection fell short because of role conflicts"
            );
        }
        Ok(report)
    }

    fn insert(&mut self, node: NodeId, role: NodeRole) -> bool {
        self.roles[node] = role;
        match role {
            NodeRole::Target => self.target_set.insert(node),
            NodeRole::Initial => self.initial_set.insert(node),
            NodeRole::Player => false,
        }
    }
}

impl std::fmt::Display for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let roles: String = self
            .roles
            .iter()
            .map(|role| match role {
                NodeRole::Target => 'T',
                NodeRole::Initial => 'I',
                NodeRole::Player => 'P',
            })
            .collect();
        write!(
            f,
            "roles {roles} | targets {:?} | initial {:?}",
            sorted(&self.target_set),
            sorted(&self.initial_set)
        )
    }
}

fn role_members(roles: &[NodeRole], role: NodeRole) -> NodeSet {
    roles
        .iter()
        .enumerate()
        .filter(|&(_, r)| *r == role)
        .map(|(node, _)| node)
        .collect()
}
