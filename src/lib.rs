//! Crossroads engine library.
//!
//! Exposes the board graph, movement resolver, card engine, turn state
//! machine, protocol and simulation modules for use by integration tests
//! and the binary entry points.

pub mod board;
pub mod cards;
pub mod engine;
pub mod error;
pub mod game;
pub mod movement;
pub mod protocol;
pub mod simulate;

pub use error::{ConfigError, GameError};
