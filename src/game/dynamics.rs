//! Round-robin best-response driver shared by both games

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result, types::NodeId};

/// Round cap used when a caller has no better bound
pub const DEFAULT_MAX_ROUNDS: usize = 1000;

/// How a run of best-response dynamics ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convergence {
    /// A full round passed without any player changing its action
    Equilibrium,
    /// The round cap was hit while players were still changing
    RoundLimit,
}

/// Result of [`run_rounds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Rounds played, including the final quiet round
    pub rounds: usize,
    pub convergence: Convergence,
}

impl RoundSummary {
    pub fn converged(&self) -> bool {
        self.convergence == Convergence::Equilibrium
    }
}

/// Update `players` one at a time, in order, until a round changes nothing
/// or `max_rounds` rounds have been played.
///
/// `update` applies a player's best response and reports whether its action
/// changed. Later players in a round observe the updates of earlier ones.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when `max_rounds` is zero, and
/// propagates errors from `update`.
pub fn run_rounds<F>(players: &[NodeId], max_rounds: usize, mut update: F) -> Result<RoundSummary>
where
    F: FnMut(NodeId) -> Result<bool>,
{
    if max_rounds == 0 {
        return Err(Error::InvalidConfiguration {
            message: "max_rounds must be at least 1".to_string(),
        });
    }

    let mut rounds = 0;
    while rounds < max_rounds {
        let mut changes = 0;
        for &player in players {
            if update(player)? {
                changes += 1;
            }
        }
        rounds += 1;
        debug!(round = rounds, changes, "best-response round finished");

        if changes == 0 {
            return Ok(RoundSummary {
                rounds,
                convergence: Convergence::Equilibrium,
            });
        }
    }

    warn!(
        rounds,
        players = players.len(),
        "best-response dynamics did not converge"
    );
    Ok(RoundSummary {
        rounds,
        convergence: Convergence::RoundLimit,
    })
}
