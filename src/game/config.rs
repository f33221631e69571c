//! Game options.
//!
//! Options reach a game three ways: the `Default` impl, a JSON document
//! (missing fields take their defaults), and `setoption name <n> value <v>`
//! pairs from the protocol, which go through `set_option`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::ReshufflePolicy;
use crate::error::ConfigError;

/// Default number of sides on the die.
pub const DEFAULT_DIE_SIDES: u32 = 6;

/// Default round limit.
pub const DEFAULT_MAX_ROUNDS: u32 = 200;

/// Largest die accepted by `DieSides`.
pub const MAX_DIE_SIDES: u32 = 100;

/// How the rotation is decided once roles are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOrderPolicy {
    /// Seat order.
    Seating,
    /// Everyone rolls; highest goes first, ties keep seat order.
    #[default]
    RollOff,
}

impl TurnOrderPolicy {
    pub const fn name(self) -> &'static str {
        match self {
            TurnOrderPolicy::Seating => "seating",
            TurnOrderPolicy::RollOff => "rolloff",
        }
    }

    pub fn from_name(s: &str) -> Option<TurnOrderPolicy> {
        match s.to_ascii_lowercase().as_str() {
            "seating" => Some(TurnOrderPolicy::Seating),
            "rolloff" => Some(TurnOrderPolicy::RollOff),
            _ => None,
        }
    }
}

impl fmt::Display for TurnOrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed; 0 seeds from entropy.
    pub seed: u64,
    pub die_sides: u32,
    pub starting_resources: i64,
    pub turn_order: TurnOrderPolicy,
    /// Finished players lose their turns.
    pub skip_finished: bool,
    /// The game ends after this many full rounds.
    pub max_rounds: Option<u32>,
    pub reshuffle: ReshufflePolicy,
    /// Acknowledging a draw card resumes movement with the unused budget.
    pub carry_over_after_draw: bool,
    /// Draw an event card at the end of every unfinished player's turn.
    pub end_of_turn_events: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seed: 0,
            die_sides: DEFAULT_DIE_SIDES,
            starting_resources: 0,
            turn_order: TurnOrderPolicy::default(),
            skip_finished: true,
            max_rounds: Some(DEFAULT_MAX_ROUNDS),
            reshuffle: ReshufflePolicy::default(),
            carry_over_after_draw: false,
            end_of_turn_events: true,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl GameConfig {
    /// Parses a config from JSON and validates it.
    pub fn from_json(json: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde and the public fields cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DIE_SIDES).contains(&self.die_sides) {
            return Err(ConfigError::InvalidOption {
                name: "DieSides".to_string(),
                value: self.die_sides.to_string(),
            });
        }
        Ok(())
    }

    /// Sets one option by its protocol name (case-insensitive).
    ///
    /// The config is unchanged when an error is returned.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            "diesides" => {
                let sides: u32 = value.parse().map_err(|_| invalid())?;
                if !(1..=MAX_DIE_SIDES).contains(&sides) {
                    return Err(invalid());
                }
                self.die_sides = sides;
            }
            "startingresources" => self.starting_resources = value.parse().map_err(|_| invalid())?,
            "turnorder" => self.turn_order = TurnOrderPolicy::from_name(value).ok_or_else(invalid)?,
            "skipfinished" => self.skip_finished = parse_bool(value).ok_or_else(invalid)?,
            "maxrounds" => {
                self.max_rounds = match value.to_ascii_lowercase().as_str() {
                    "none" | "0" => None,
                    v => Some(v.parse().map_err(|_| invalid())?),
                }
            }
            "reshuffle" => self.reshuffle = ReshufflePolicy::from_name(value).ok_or_else(invalid)?,
            "carryoverafterdraw" => self.carry_over_after_draw = parse_bool(value).ok_or_else(invalid)?,
            "endofturnevents" => self.end_of_turn_events = parse_bool(value).ok_or_else(invalid)?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Option declarations for the protocol handshake, with current values as defaults.
    pub fn option_lines(&self) -> Vec<String> {
        vec![
            format!("option name Seed type spin default {} min 0 max {}", self.seed, u64::MAX),
            format!(
                "option name DieSides type spin default {} min 1 max {}",
                self.die_sides, MAX_DIE_SIDES
            ),
            format!(
                "option name StartingResources type spin default {}",
                self.starting_resources
            ),
            format!(
                "option name TurnOrder type combo default {} var seating var rolloff",
                self.turn_order
            ),
            format!("option name SkipFinished type check default {}", self.skip_finished),
            format!(
                "option name MaxRounds type spin default {} min 0",
                self.max_rounds.unwrap_or(0)
            ),
            format!(
                "option name Reshuffle type combo default {} var reshuffle var never",
                self.reshuffle
            ),
            format!(
                "option name CarryOverAfterDraw type check default {}",
                self.carry_over_after_draw
            ),
            format!(
                "option name EndOfTurnEvents type check default {}",
                self.end_of_turn_events
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GameConfig::default();
        assert_eq!(c.die_sides, 6);
        assert!(c.skip_finished);
        assert!(!c.carry_over_after_draw);
        assert_eq!(c.turn_order, TurnOrderPolicy::RollOff);
        assert_eq!(c.reshuffle, ReshufflePolicy::Reshuffle);
        assert_eq!(c.max_rounds, Some(200));
    }

    #[test]
    fn set_known_options() {
        let mut c = GameConfig::default();
        c.set_option("Seed", "42").unwrap();
        c.set_option("diesides", "8").unwrap();
        c.set_option("TurnOrder", "seating").unwrap();
        c.set_option("SkipFinished", "false").unwrap();
        c.set_option("MaxRounds", "none").unwrap();
        c.set_option("Reshuffle", "never").unwrap();
        c.set_option("CarryOverAfterDraw", "true").unwrap();
        c.set_option("EndOfTurnEvents", "off").unwrap();
        c.set_option("StartingResources", "-3").unwrap();
        assert_eq!(
            c,
            GameConfig {
                seed: 42,
                die_sides: 8,
                starting_resources: -3,
                turn_order: TurnOrderPolicy::Seating,
                skip_finished: false,
                max_rounds: None,
                reshuffle: ReshufflePolicy::Never,
                carry_over_after_draw: true,
                end_of_turn_events: false,
            }
        );
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut c = GameConfig::default();
        assert_eq!(
            c.set_option("Speed", "9"),
            Err(ConfigError::UnknownOption("Speed".to_string()))
        );
        assert_eq!(c, GameConfig::default());
    }

    #[test]
    fn bad_value_leaves_config_unchanged() {
        let mut c = GameConfig::default();
        assert!(matches!(
            c.set_option("DieSides", "0"),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert!(c.set_option("SkipFinished", "maybe").is_err());
        assert!(c.set_option("Seed", "-1").is_err());
        assert_eq!(c, GameConfig::default());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let c = GameConfig::from_json(r#"{"seed": 9, "turn_order": "seating"}"#).unwrap();
        assert_eq!(c.seed, 9);
        assert_eq!(c.turn_order, TurnOrderPolicy::Seating);
        assert_eq!(c.die_sides, DEFAULT_DIE_SIDES);
        assert!(GameConfig::from_json("[1]").is_err());
    }

    #[test]
    fn json_die_sides_out_of_range_is_rejected() {
        assert_eq!(
            GameConfig::from_json(r#"{"seed": 3, "die_sides": 0, "turn_order": "seating"}"#),
            Err(ConfigError::InvalidOption {
                name: "DieSides".to_string(),
                value: "0".to_string(),
            })
        );
        assert!(GameConfig::from_json(r#"{"die_sides": 101}"#).is_err());
        assert!(GameConfig::from_json(r#"{"die_sides": 100}"#).is_ok());
    }

    #[test]
    fn validate_checks_public_fields() {
        let mut c = GameConfig::default();
        assert!(c.validate().is_ok());
        c.die_sides = 0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidOption { .. })));
    }

    #[test]
    fn option_lines_declare_types() {
        let lines = GameConfig::default().option_lines();
        assert_eq!(lines.len(), 9);
        for l in &lines {
            assert!(l.starts_with("option name "));
            assert!(l.contains(" type "));
        }
    }
}
