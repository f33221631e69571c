//! Card records and deck identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{PathColor, ResourceKind, RoleMap};

/// Number of decks: one per path plus the end-of-turn event deck.
pub const DECK_COUNT: usize = 5;

/// Which deck a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DeckId {
    Purple = 0,
    Orange = 1,
    Green = 2,
    Blue = 3,
    Event = 4,
}

pub const ALL_DECKS: [DeckId; DECK_COUNT] = [
    DeckId::Purple,
    DeckId::Orange,
    DeckId::Green,
    DeckId::Blue,
    DeckId::Event,
];

impl DeckId {
    /// The deck a draw space of the given path color draws from.
    pub const fn for_path(color: PathColor) -> DeckId {
        match color {
            PathColor::Purple => DeckId::Purple,
            PathColor::Orange => DeckId::Orange,
            PathColor::Green => DeckId::Green,
            PathColor::Blue => DeckId::Blue,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DeckId::Purple => "purple",
            DeckId::Orange => "orange",
            DeckId::Green => "green",
            DeckId::Blue => "blue",
            DeckId::Event => "event",
        }
    }

    pub fn from_name(s: &str) -> Option<DeckId> {
        ALL_DECKS
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(s))
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a card in its `CardLibrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u16);

impl CardId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a card does to one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effect {
    /// Resource deltas, each kind at most once.
    pub changes: Vec<(ResourceKind, i64)>,
    pub explanation: String,
}

impl Effect {
    /// The delta for `kind`, zero when the effect leaves it alone.
    pub fn delta(&self, kind: ResourceKind) -> i64 {
        self.changes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, d)| d)
            .unwrap_or(0)
    }
}

/// An immutable card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub deck: DeckId,
    pub name: String,
    pub description: String,
    pub effects: RoleMap<Effect>,
}
