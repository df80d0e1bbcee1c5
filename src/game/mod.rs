//! Best-response games over a shared node-role partition
//!
//! This module provides:
//! - [`GameContext`]: target/initial/player roles and result sets
//! - [`SeedSelectionGame`]: participate/abstain decisions with a cost `alpha`
//! - [`ThresholdSelectionGame`]: a diffuser choosing per-node thresholds
//! - The round-robin driver both games share

pub mod context;
pub mod dynamics;
pub mod profile;
pub mod seed_selection;
pub mod threshold_selection;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use context::{DEFAULT_SEED, GameContext, SelectionReport};
pub use dynamics::{Convergence, DEFAULT_MAX_ROUNDS, RoundSummary};
pub use profile::StrategyProfile;
pub use seed_selection::{DEFAULT_ALPHA, Participation, SeedConfiguration, SeedSelectionGame};
pub use threshold_selection::{ThresholdConfiguration, ThresholdSelectionGame};

/// The two games, as experiments refer to them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    SeedSelection,
    ThresholdSelection,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::SeedSelection, GameKind::ThresholdSelection];

    /// Result file stem used by the experiment outputs
    pub fn model_name(&self) -> &'static str {
        match self {
            GameKind::SeedSelection => "model-1",
            GameKind::ThresholdSelection => "model-2",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::SeedSelection => f.write_str("seed selection"),
            GameKind::ThresholdSelection => f.write_str("threshold selection"),
        }
    }
}
