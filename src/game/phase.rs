//! Game phases and turn rotation.
//!
//! Phase flow:
//! - Setup         -> RoleSelection (roles assigned)
//! - RoleSelection -> TurnOrder (rotation decided)
//! - TurnOrder     -> TurnInProgress(AwaitingRoll)
//! - AwaitingRoll  -> AwaitingChoice | AwaitingCardAck | TurnComplete | GameOver
//! - AwaitingChoice -> same targets as AwaitingRoll
//! - AwaitingCardAck -> TurnComplete (or back into movement under carry-over)
//! - TurnComplete  -> TurnInProgress(AwaitingRoll) for the next player, or GameOver

use std::fmt;

use serde::{Serialize, Serializer};

/// Sub-phase of an active turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnStep {
    AwaitingRoll,
    AwaitingChoice,
    AwaitingCardAck,
}

impl TurnStep {
    pub const fn name(self) -> &'static str {
        match self {
            TurnStep::AwaitingRoll => "awaiting-roll",
            TurnStep::AwaitingChoice => "awaiting-choice",
            TurnStep::AwaitingCardAck => "awaiting-card-ack",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    RoleSelection,
    TurnOrder,
    TurnInProgress(TurnStep),
    TurnComplete,
    GameOver,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::RoleSelection => "role-selection",
            Phase::TurnOrder => "turn-order",
            Phase::TurnInProgress(step) => step.name(),
            Phase::TurnComplete => "turn-complete",
            Phase::GameOver => "game-over",
        }
    }

    pub const fn is_over(self) -> bool {
        matches!(self, Phase::GameOver)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Where the rotation goes after the active player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextTurn {
    /// Rotation index of the next active player.
    pub index: usize,
    /// The rotation passed its end, so a new round starts.
    pub wrapped: bool,
}

/// Computes the next active rotation index.
///
/// `finished[i]` tells whether the player at rotation index `i` has
/// finished. With `skip_finished` those players are passed over; if every
/// player has finished there is no next turn.
pub fn next_turn(active: usize, finished: &[bool], skip_finished: bool) -> Option<NextTurn> {
    let n = finished.len();
    (1..=n).find_map(|k| {
        let index = (active + k) % n;
        if skip_finished && finished[index] {
            return None;
        }
        Some(NextTurn {
            index,
            wrapped: active + k >= n,
        })
    })
}
