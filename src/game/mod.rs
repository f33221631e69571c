//! Turn/phase state machine.
//!
//! Drives setup, role assignment, turn order and the per-turn cycle, calling
//! into the movement resolver and the card effect engine on behalf of the
//! active player.

pub mod computer;
pub mod config;
pub mod event;
pub mod phase;
pub mod snapshot;
pub mod state;

pub use config::{GameConfig, TurnOrderPolicy};
pub use event::{EventLog, GameEvent, GameObserver, TracingObserver};
pub use phase::{next_turn, NextTurn, Phase, TurnStep};
pub use snapshot::{GameSnapshot, PlayerView};
pub use state::{ActionOutcome, DrawnCard, Game};
