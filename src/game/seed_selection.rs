//! Seed selection game
//!
//! Every non-target node decides whether to join the seed set. A player's cost
//! is the number of targets left uncovered plus `alpha` if it participates:
//!
//! `cost_u(s) = |T| - |Expand(active(s)) ∩ T| + alpha * s_u`

use std::{fmt, str::FromStr};

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::{
    context::GameContext,
    dynamics::{RoundSummary, run_rounds},
    profile::StrategyProfile,
};
use crate::{
    Error, Result,
    graph::WeightedGraph,
    types::{NodeId, NodeRole, NodeSet, intersection_size},
};

/// Participation cost used by the canonical experiments
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Action of a player in the seed selection game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participation {
    Abstain,
    Participate,
}

impl Participation {
    /// Numeric action stored in the strategy profile
    pub fn action(self) -> u32 {
        match self {
            Participation::Abstain => 0,
            Participation::Participate => 1,
        }
    }

    pub fn from_action(action: u32) -> Self {
        if action == 0 {
            Participation::Abstain
        } else {
            Participation::Participate
        }
    }
}

/// Starting profile of the seed selection game
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedConfiguration {
    /// Nobody participates
    Empty,
    /// Every player participates
    #[default]
    Complete,
    /// A uniformly drawn number of uniformly chosen players participates
    Random,
    /// Exactly the given nodes participate
    Explicit(NodeSet),
    /// The context's initial set at game creation participates
    FromInitialSet,
}

impl SeedConfiguration {
    pub fn label(&self) -> &'static str {
        match self {
            SeedConfiguration::Empty => "empty",
            SeedConfiguration::Complete => "complete",
            SeedConfiguration::Random => "random",
            SeedConfiguration::Explicit(_) => "explicit",
            SeedConfiguration::FromInitialSet => "initial-set",
        }
    }
}

impl fmt::Display for SeedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeedConfiguration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(SeedConfiguration::Empty),
            "complete" => Ok(SeedConfiguration::Complete),
            "random" => Ok(SeedConfiguration::Random),
            "initial-set" | "initial" => Ok(SeedConfiguration::FromInitialSet),
            _ => Err(Error::ParseOption {
                kind: "seed configuration".to_string(),
                input: s.to_string(),
                expected: "empty, complete, random, initial-set".to_string(),
            }),
        }
    }
}

/// Best-response dynamics over participate/abstain decisions
pub struct SeedSelectionGame<'a> {
    graph: &'a WeightedGraph,
    context: &'a mut GameContext,
    alpha: f64,
    players: Vec<NodeId>,
    seeded: NodeSet,
    profile: StrategyProfile,
}

impl<'a> SeedSelectionGame<'a> {
    /// Create a game over every non-target node of `context`.
    ///
    /// The starting profile has the context's current initial nodes
    /// participating; those nodes become players for the duration of the
    /// game.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the context and graph disagree on
    /// the node count.
    pub fn new(graph: &'a WeightedGraph, context: &'a mut GameContext) -> Result<Self> {
        if context.node_count() != graph.node_count() {
            return Err(Error::SizeMismatch {
                context: context.node_count(),
                graph: graph.node_count(),
            });
        }

        let seeded = context.initial_set().clone();
        context.clear_initial_set();

        let players: Vec<NodeId> = (0..context.node_count())
            .filter(|&node| context.role(node) != NodeRole::Target)
            .collect();
        let profile = players
            .iter()
            .map(|&node| (node, u32::from(seeded.contains(&node))))
            .collect();

        Ok(Self {
            graph,
            context,
            alpha: DEFAULT_ALPHA,
            players,
            seeded,
            profile,
        })
    }

    /// Set the participation cost.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`] for negative or non-finite values.
    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(Error::InvalidAlpha { value: alpha });
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Reset the strategy profile.
    ///
    /// `Random` draws the participant count uniformly from `[1, players]` and
    /// then picks that many players uniformly, using the context generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if an explicit node is out of range.
    pub fn initialize(&mut self, configuration: &SeedConfiguration) -> Result<()> {
        let participants: NodeSet = match configuration {
            SeedConfiguration::Empty => NodeSet::new(),
            SeedConfiguration::Complete => self.players.iter().copied().collect(),
            SeedConfiguration::Random => {
                let rng = self.context.rng_mut();
                random_participants(&self.players, rng)
            }
            SeedConfiguration::Explicit(nodes) => {
                if let Some(&node) = nodes.iter().find(|&&n| n >= self.graph.node_count()) {
                    return Err(Error::UnknownNode {
                        node,
                        nodes: self.graph.node_count(),
                    });
                }
                nodes.clone()
            }
            SeedConfiguration::FromInitialSet => self.seeded.clone(),
        };

        for &player in &self.players {
            self.profile
                .set(player, u32::from(participants.contains(&player)));
        }
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Player nodes in update order
    pub fn players(&self) -> &[NodeId] {
        &self.players
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    /// Participating nodes under the current profile
    pub fn participants(&self) -> NodeSet {
        self.profile.active()
    }

    /// Cost of `player` for `action`, with every other player fixed.
    pub fn cost(&self, player: NodeId, action: Participation) -> f64 {
        let mut active = self.profile.active();
        match action {
            Participation::Participate => {
                active.insert(player);
            }
            Participation::Abstain => {
                active.remove(&player);
            }
        }

        let influence = self.graph.expand(&active);
        let targets = self.context.target_set();
        let uncovered = targets.len() - intersection_size(&influence, targets);
        uncovered as f64 + self.alpha * f64::from(action.action())
    }

    /// Cheapest action of `player`. Ties favor participation.
    ///
    /// Both candidate costs are read-only and evaluated in parallel.
    pub fn best_response(&self, player: NodeId) -> Participation {
        let (abstain, participate) = rayon::join(
            || self.cost(player, Participation::Abstain),
            || self.cost(player, Participation::Participate),
        );
        if abstain < participate {
            Participation::Abstain
        } else {
            Participation::Participate
        }
    }

    /// Whether no player can lower its cost by deviating alone
    pub fn is_equilibrium(&self) -> bool {
        self.players.iter().all(|&player| {
            self.profile.get(player).map(Participation::from_action)
                == Some(self.best_response(player))
        })
    }

    /// Run round-robin best responses in ascending node order until a round
    /// changes nothing or `max_rounds` is reached.
    ///
    /// Participating nodes then become the context's initial set and one
    /// final diffusion fills its final influence.
    pub fn game_dynamics(&mut self, max_rounds: usize) -> Result<RoundSummary> {
        let players = self.players.clone();
        let summary = run_rounds(&players, max_rounds, |player| {
            let response = self.best_response(player);
            Ok(self.profile.set(player, response.action()))
        })?;

        self.context.replace_initial_set(self.profile.active());
        let influence = self.graph.expand(self.context.initial_set());
        self.context.set_final_influence(influence);
        Ok(summary)
    }
}

fn random_participants<R: Rng + ?Sized>(players: &[NodeId], rng: &mut R) -> NodeSet {
    if players.is_empty() {
        return NodeSet::new();
    }
    let count = rng.random_range(1..=players.len());
    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    shuffled.into_iter().take(count).collect()
}
