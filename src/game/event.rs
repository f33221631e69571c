//! Outcome events and observers.
//!
//! Events are published after an action has been committed. Observers get
//! a shared reference only, so a renderer, logger or animation driver can
//! react to the game but never change it.

use serde::Serialize;

use crate::board::{Coord, PathColor, PlayerId, ResourceKind, Role};
use crate::cards::{CardId, DeckId};
use crate::movement::{Branch, StopReason};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RolesAssigned {
        roles: Vec<(PlayerId, Role)>,
    },
    TurnOrderDecided {
        rotation: Vec<PlayerId>,
        /// Roll-off values in seat order; empty for seating order.
        rolls: Vec<u32>,
    },
    TurnStarted {
        player: PlayerId,
        round: u32,
    },
    DieRolled {
        player: PlayerId,
        value: u32,
    },
    PlayerMoved {
        player: PlayerId,
        from: Coord,
        to: Coord,
        steps: u32,
        stop: StopReason,
        path: PathColor,
    },
    ChoiceOffered {
        player: PlayerId,
        at: Coord,
        branches: Vec<Branch>,
    },
    BranchChosen {
        player: PlayerId,
        coord: Coord,
        color: PathColor,
    },
    CardDrawn {
        player: PlayerId,
        deck: DeckId,
        card: CardId,
        name: String,
    },
    /// A draw space was reached but its deck has nothing left to draw.
    DeckExhausted {
        player: PlayerId,
        deck: DeckId,
    },
    ResourceChanged {
        player: PlayerId,
        kind: ResourceKind,
        before: i64,
        after: i64,
    },
    PlayerFinished {
        player: PlayerId,
        rank: u32,
    },
    TurnEnded {
        player: PlayerId,
    },
    GameOver {
        round: u32,
        finish_order: Vec<PlayerId>,
    },
}

/// Receives every event a game publishes.
pub trait GameObserver: Send {
    fn notify(&mut self, event: &GameEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl GameObserver for TracingObserver {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved {
                player,
                from,
                to,
                steps,
                stop,
                ..
            } => tracing::info!(player = %player, from = %from, to = %to, steps, stop = %stop, "player moved"),
            GameEvent::CardDrawn { player, deck, name, .. } => {
                tracing::info!(player = %player, deck = %deck, card = %name, "card drawn")
            }
            GameEvent::ResourceChanged {
                player,
                kind,
                before,
                after,
            } => tracing::info!(player = %player, kind = %kind, before, after, "resource changed"),
            GameEvent::TurnEnded { player } => tracing::info!(player = %player, "turn ended"),
            GameEvent::GameOver { round, finish_order } => {
                tracing::info!(round, finished = finish_order.len(), "game over")
            }
            other => tracing::debug!(?other, "game event"),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl GameObserver for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
