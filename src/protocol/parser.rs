//! Command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the main loop dispatches on.

use crate::board::{Coord, Role};

/// A parsed client-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the protocol handshake.
    Crossroads,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set a game option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Discard the current game and open a new one in setup.
    NewGame,

    /// Seat a player: `player <name> [human|computer] [role]`.
    Player {
        name: String,
        human: bool,
        role: Option<Role>,
    },

    /// Assign roles, decide the turn order and begin the first turn.
    Start,

    /// Roll the die, or use the given value.
    Roll { value: Option<u32> },

    /// Resolve a pending choice: `choose <x>,<y>`.
    Choose { coord: Coord },

    /// Acknowledge the drawn card.
    Ack,

    EndTurn,

    /// Let the active computer player take one action.
    Auto,

    /// Print a JSON snapshot of the game.
    State,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match tokens[0] {
        "crossroads" => Some(Command::Crossroads),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "start" => Some(Command::Start),
        "ack" => Some(Command::Ack),
        "endturn" => Some(Command::EndTurn),
        "auto" => Some(Command::Auto),
        "state" => Some(Command::State),

        "setoption" => parse_setoption(&tokens),
        "player" => parse_player(&tokens),
        "roll" => parse_roll(&tokens),
        "choose" => parse_choose(&tokens),

        other => {
            tracing::warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        tracing::warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                tracing::warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `player <name> [human|computer] [role]`. Players are human by default.
fn parse_player(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 || tokens.len() > 4 {
        tracing::warn!("malformed player: expected 'player <name> [human|computer] [role]'");
        return None;
    }
    let name = tokens[1].to_string();
    let mut human = true;
    let mut role = None;

    for &tok in &tokens[2..] {
        match tok {
            "human" => human = true,
            "computer" => human = false,
            other => match Role::from_name(other) {
                Some(r) if role.is_none() => role = Some(r),
                _ => {
                    tracing::warn!(token = other, "unknown player attribute");
                    return None;
                }
            },
        }
    }

    Some(Command::Player { name, human, role })
}

/// Parses `roll [value]`.
fn parse_roll(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Roll { value: None }),
        Some(v) => match v.parse::<u32>() {
            Ok(value) => Some(Command::Roll { value: Some(value) }),
            Err(_) => {
                tracing::warn!(value = v, "invalid roll value");
                None
            }
        },
    }
}

/// Parses `choose <x>,<y>`.
fn parse_choose(tokens: &[&str]) -> Option<Command> {
    let coord = tokens[1..].join("");
    match Coord::parse(&coord) {
        Some(coord) => Some(Command::Choose { coord }),
        None => {
            tracing::warn!(coord = %coord, "malformed choose: expected 'choose <x>,<y>'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("crossroads"), Some(Command::Crossroads));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("start"), Some(Command::Start));
        assert_eq!(parse_command("ack"), Some(Command::Ack));
        assert_eq!(parse_command("endturn"), Some(Command::EndTurn));
        assert_eq!(parse_command("auto"), Some(Command::Auto));
        assert_eq!(parse_command("state"), Some(Command::State));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("teleport 1,1"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name DieSides value 8"),
            Some(Command::SetOption {
                name: "DieSides".to_string(),
                value: Some("8".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        assert_eq!(
            parse_command("setoption name Seed"),
            Some(Command::SetOption {
                name: "Seed".to_string(),
                value: None,
            })
        );
        assert_eq!(parse_command("setoption Seed 4"), None);
        assert_eq!(parse_command("setoption name value 4"), None);
    }

    #[test]
    fn parse_player_variants() {
        assert_eq!(
            parse_command("player Ana"),
            Some(Command::Player {
                name: "Ana".to_string(),
                human: true,
                role: None,
            })
        );
        assert_eq!(
            parse_command("player Bot computer investor"),
            Some(Command::Player {
                name: "Bot".to_string(),
                human: false,
                role: Some(Role::Investor),
            })
        );
        assert_eq!(
            parse_command("player Cy Historian"),
            Some(Command::Player {
                name: "Cy".to_string(),
                human: true,
                role: Some(Role::Historian),
            })
        );
    }

    #[test]
    fn parse_player_malformed_returns_none() {
        assert_eq!(parse_command("player"), None);
        assert_eq!(parse_command("player Ana wizard"), None);
        assert_eq!(parse_command("player Ana investor activist"), None);
    }

    #[test]
    fn parse_roll_values() {
        assert_eq!(parse_command("roll"), Some(Command::Roll { value: None }));
        assert_eq!(parse_command("roll 4"), Some(Command::Roll { value: Some(4) }));
        assert_eq!(parse_command("roll four"), None);
    }

    #[test]
    fn parse_choose_coordinate() {
        assert_eq!(
            parse_command("choose 566,273"),
            Some(Command::Choose {
                coord: Coord::new(566, 273)
            })
        );
        assert_eq!(
            parse_command("choose 566, 273"),
            Some(Command::Choose {
                coord: Coord::new(566, 273)
            })
        );
        assert_eq!(parse_command("choose"), None);
        assert_eq!(parse_command("choose north"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
    }
}
