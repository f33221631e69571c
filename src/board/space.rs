//! Board coordinates, path colors, and space records.
//!
//! A coordinate is only an identity key for a space; it carries no geometry
//! the engine relies on. Spaces are immutable once a `Board` is built.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of colored paths on the board.
pub const PATH_COUNT: usize = 4;

/// A 2D board coordinate, written `x,y` in text and `[x, y]` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Parses the `x,y` text form. Whitespace around either number is allowed.
    pub fn parse(s: &str) -> Option<Coord> {
        let (x, y) = s.trim().split_once(',')?;
        let x = x.trim().parse().ok()?;
        let y = y.trim().parse().ok()?;
        Some(Coord { x, y })
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Coord { x, y }
    }
}

impl From<Coord> for [i32; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One of the four colored paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PathColor {
    Purple = 0,
    Orange = 1,
    Green = 2,
    Blue = 3,
}

/// All path colors in index order.
pub const ALL_COLORS: [PathColor; PATH_COUNT] = [
    PathColor::Purple,
    PathColor::Orange,
    PathColor::Green,
    PathColor::Blue,
];

impl PathColor {
    /// Returns the lowercase name used in the protocol and in JSON.
    pub const fn name(self) -> &'static str {
        match self {
            PathColor::Purple => "purple",
            PathColor::Orange => "orange",
            PathColor::Green => "green",
            PathColor::Blue => "blue",
        }
    }

    /// Looks up a color by name (case-insensitive).
    pub fn from_name(s: &str) -> Option<PathColor> {
        ALL_COLORS
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PathColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happens when a piece lands on a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    Regular,
    Draw,
    Choicepoint,
    Start,
    Finish,
}

impl SpaceKind {
    pub const fn name(self) -> &'static str {
        match self {
            SpaceKind::Regular => "regular",
            SpaceKind::Draw => "draw",
            SpaceKind::Choicepoint => "choicepoint",
            SpaceKind::Start => "start",
            SpaceKind::Finish => "finish",
        }
    }

    /// START and FINISH are shared by every path and carry no color.
    pub const fn is_junction(self) -> bool {
        matches!(self, SpaceKind::Start | SpaceKind::Finish)
    }
}

impl fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node in the board graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub coord: Coord,
    #[serde(default)]
    pub color: Option<PathColor>,
    pub kind: SpaceKind,
    #[serde(default)]
    pub successors: Vec<Coord>,
}

impl Space {
    pub fn new(coord: Coord, color: Option<PathColor>, kind: SpaceKind, successors: Vec<Coord>) -> Self {
        Space {
            coord,
            color,
            kind,
            successors,
        }
    }
}
