//! Error types.
//!
//! `ConfigError` covers malformed board or card content and bad options; it
//! is detected when content is loaded and is fatal to startup.
//! `GameError` covers everything that can go wrong while playing. Runtime
//! errors never leave a game partially mutated.

use thiserror::Error;

use crate::board::{Coord, PathColor, PlayerId, Role, SpaceKind};
use crate::cards::DeckId;
use crate::game::Phase;

/// Errors in static board/card content or in game options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid content JSON: {0}")]
    Json(String),

    #[error("duplicate space at {0}")]
    DuplicateSpace(Coord),

    #[error("expected exactly one start space, found {0}")]
    StartCount(usize),

    #[error("expected exactly one finish space, found {0}")]
    FinishCount(usize),

    #[error("space {from} points at missing space {to}")]
    DanglingSuccessor { from: Coord, to: Coord },

    #[error("{kind} space {coord} has {count} successors")]
    SuccessorCount {
        coord: Coord,
        kind: SpaceKind,
        count: usize,
    },

    #[error("choicepoint {0} lists the same branch twice")]
    DuplicateBranch(Coord),

    #[error("choicepoint {0} branches onto a junction space")]
    UncoloredBranch(Coord),

    #[error("space {0} has no path color")]
    UncoloredSpace(Coord),

    #[error("junction space {0} must not have a path color")]
    ColoredJunction(Coord),

    #[error("start has no single branch onto the {0} path")]
    StartBranch(PathColor),

    #[error("no path defined for {0}")]
    MissingPath(PathColor),

    #[error("{0} path is defined more than once")]
    DuplicatePath(PathColor),

    #[error("{color} path references missing space {coord}")]
    DanglingPathSpace { color: PathColor, coord: Coord },

    #[error("{color} path includes {coord}, which is not a {color} space")]
    PathColorMismatch { color: PathColor, coord: Coord },

    #[error("{color} path does not connect at {at}")]
    BrokenPath { color: PathColor, at: Coord },

    #[error("board contains a cycle through {0}")]
    Cycle(Coord),

    #[error("space {0} is unreachable from start")]
    Unreachable(Coord),

    #[error("card '{card}' has no effect for {role}")]
    MissingRoleEffect { card: String, role: Role },

    #[error("a card in the {0} deck has an empty name")]
    EmptyCardName(DeckId),

    #[error("{0} deck has no cards")]
    EmptyDeck(DeckId),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },
}

/// Errors returned by game actions. The game is unchanged when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot {action} during {phase}")]
    IllegalAction { action: &'static str, phase: Phase },

    #[error("{0} is not one of the offered branches")]
    InvalidChoice(Coord),

    #[error("{0} has already finished")]
    AlreadyFinished(PlayerId),

    #[error("{0} deck is empty")]
    DeckEmpty(DeckId),

    #[error("{players} players but only {roles} roles")]
    NotEnoughRoles { players: usize, roles: usize },

    #[error("no players have joined")]
    NoPlayers,

    #[error("role {0} is already taken")]
    RoleTaken(Role),

    #[error("die value {0} is out of range")]
    InvalidRoll(u32),

    #[error("no space at {0}")]
    UnknownSpace(Coord),

    #[error("no player {0}")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
