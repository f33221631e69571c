//! Text protocol handling.
//!
//! This module implements the command parser for the main loop and the
//! line notation used to report game events back to the client.

pub mod notation;
pub mod parser;

pub use notation::format_event;
pub use parser::{parse_command, Command};
