//! Read-only, serializable views of a game for renderers.

use serde::Serialize;

use super::phase::Phase;
use super::state::ActionOutcome;
use crate::board::{Coord, PathColor, PlayerId, Resources, Role};
use crate::movement::Branch;

/// One seated player as seen from outside the engine.
///
/// During setup players have no role yet unless they asked for one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub human: bool,
    pub role: Option<Role>,
    pub position: Coord,
    pub path: Option<PathColor>,
    pub resources: Resources,
    pub finished: bool,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub active: Option<PlayerId>,
    pub rotation: Vec<PlayerId>,
    pub players: Vec<PlayerView>,
    pub finish_order: Vec<PlayerId>,
    /// Branches on offer while a choice is pending.
    pub branches: Vec<Branch>,
    pub last_outcome: Option<ActionOutcome>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> String {
        // Every field serializes to plain JSON values; failure is impossible.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}
