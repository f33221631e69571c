//! The validated board graph.
//!
//! Spaces live in an arena keyed by coordinate; paths hold ordered
//! coordinate lists into that arena, so the shared START and FINISH
//! junctions have a single identity referenced by all four paths.
//!
//! `Board::new` checks the whole graph up front and refuses to build a
//! board that could strand a piece: dangling successors, wrong successor
//! counts, broken paths, cycles and unreachable spaces are all rejected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::space::{Coord, PathColor, Space, SpaceKind, ALL_COLORS, PATH_COUNT};
use crate::error::ConfigError;

/// Declares the ordered spaces of one colored path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDef {
    pub color: PathColor,
    pub spaces: Vec<Coord>,
}

/// Raw board content as supplied by a content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardContent {
    pub spaces: Vec<Space>,
    pub paths: Vec<PathDef>,
}

impl BoardContent {
    /// The standard four-path board.
    pub fn standard() -> Self {
        super::layout::standard()
    }

    /// Parses board content from JSON. The result still has to pass `Board::new`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

/// One colored path: an ordered list of coordinates from its first space
/// up to (not including) FINISH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    color: PathColor,
    spaces: Vec<Coord>,
}

impl Path {
    pub fn color(&self) -> PathColor {
        self.color
    }

    /// The first space of the path, a successor of START.
    pub fn start(&self) -> Coord {
        self.spaces[0]
    }

    pub fn spaces(&self) -> &[Coord] {
        &self.spaces
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.spaces.contains(&coord)
    }
}

/// Immutable, validated board graph.
#[derive(Debug, Clone)]
pub struct Board {
    spaces: HashMap<Coord, Space>,
    paths: Vec<Path>,
    start: Coord,
    finish: Coord,
}

impl Board {
    /// Builds and validates a board.
    pub fn new(content: BoardContent) -> Result<Board, ConfigError> {
        let mut spaces = HashMap::with_capacity(content.spaces.len());
        for space in content.spaces {
            let coord = space.coord;
            if spaces.insert(coord, space).is_some() {
                return Err(ConfigError::DuplicateSpace(coord));
            }
        }

        let start = single_of_kind(&spaces, SpaceKind::Start).map_err(ConfigError::StartCount)?;
        let finish = single_of_kind(&spaces, SpaceKind::Finish).map_err(ConfigError::FinishCount)?;

        check_spaces(&spaces)?;
        check_start(&spaces, start)?;
        let paths = build_paths(&spaces, start, finish, content.paths)?;
        check_acyclic(&spaces, start)?;

        Ok(Board {
            spaces,
            paths,
            start,
            finish,
        })
    }

    /// The standard four-path board.
    pub fn standard() -> Result<Board, ConfigError> {
        Board::new(BoardContent::standard())
    }

    pub fn space_at(&self, coord: Coord) -> Option<&Space> {
        self.spaces.get(&coord)
    }

    pub fn path_for(&self, color: PathColor) -> &Path {
        &self.paths[color.index()]
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn finish(&self) -> Coord {
        self.finish
    }

    pub fn spaces(&self) -> impl Iterator<Item = &Space> {
        self.spaces.values()
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }
}

/// Returns the unique coordinate of the given kind, or the count found.
fn single_of_kind(spaces: &HashMap<Coord, Space>, kind: SpaceKind) -> Result<Coord, usize> {
    let found: Vec<Coord> = spaces
        .values()
        .filter(|s| s.kind == kind)
        .map(|s| s.coord)
        .collect();
    match found.as_slice() {
        [only] => Ok(*only),
        _ => Err(found.len()),
    }
}

/// Per-space checks: colors, successor counts, dangling successors.
fn check_spaces(spaces: &HashMap<Coord, Space>) -> Result<(), ConfigError> {
    for space in spaces.values() {
        match (space.kind.is_junction(), space.color) {
            (true, Some(_)) => return Err(ConfigError::ColoredJunction(space.coord)),
            (false, None) => return Err(ConfigError::UncoloredSpace(space.coord)),
            _ => {}
        }

        let count = space.successors.len();
        let count_ok = match space.kind {
            SpaceKind::Regular | SpaceKind::Draw => count == 1,
            SpaceKind::Choicepoint => count >= 2,
            SpaceKind::Start => count == PATH_COUNT,
            SpaceKind::Finish => count == 0,
        };
        if !count_ok {
            return Err(ConfigError::SuccessorCount {
                coord: space.coord,
                kind: space.kind,
                count,
            });
        }

        for (i, next) in space.successors.iter().enumerate() {
            let target = spaces.get(next).ok_or(ConfigError::DanglingSuccessor {
                from: space.coord,
                to: *next,
            })?;
            if space.kind == SpaceKind::Choicepoint {
                if space.successors[..i].contains(next) {
                    return Err(ConfigError::DuplicateBranch(space.coord));
                }
                if target.color.is_none() {
                    return Err(ConfigError::UncoloredBranch(space.coord));
                }
            }
        }
    }
    Ok(())
}

/// START must branch onto exactly one first space per color.
fn check_start(spaces: &HashMap<Coord, Space>, start: Coord) -> Result<(), ConfigError> {
    let successors = &spaces[&start].successors;
    for &color in &ALL_COLORS {
        let matching = successors
            .iter()
            .filter(|c| spaces.get(c).and_then(|s| s.color) == Some(color))
            .count();
        if matching != 1 {
            return Err(ConfigError::StartBranch(color));
        }
    }
    Ok(())
}

/// Validates the declared paths and returns them indexed by color.
///
/// Walking a path takes the single successor of regular and draw spaces and
/// the same-colored branch of a choicepoint; each step has to land on the
/// next declared space, and the last one has to lead to FINISH.
fn build_paths(
    spaces: &HashMap<Coord, Space>,
    start: Coord,
    finish: Coord,
    defs: Vec<PathDef>,
) -> Result<Vec<Path>, ConfigError> {
    let mut by_color: [Option<Path>; PATH_COUNT] = Default::default();

    for def in defs {
        let color = def.color;
        if by_color[color.index()].is_some() {
            return Err(ConfigError::DuplicatePath(color));
        }
        let first = *def.spaces.first().ok_or(ConfigError::MissingPath(color))?;

        for &coord in &def.spaces {
            let space = spaces
                .get(&coord)
                .ok_or(ConfigError::DanglingPathSpace { color, coord })?;
            if space.color != Some(color) {
                return Err(ConfigError::PathColorMismatch { color, coord });
            }
        }

        if !spaces[&start].successors.contains(&first) {
            return Err(ConfigError::BrokenPath { color, at: start });
        }

        for (i, &coord) in def.spaces.iter().enumerate() {
            let expected = def.spaces.get(i + 1).copied().unwrap_or(finish);
            let space = &spaces[&coord];
            let next = match space.kind {
                SpaceKind::Choicepoint => space
                    .successors
                    .iter()
                    .copied()
                    .find(|c| *c == expected && (*c == finish || spaces[c].color == Some(color))),
                _ => space.successors.first().copied(),
            };
            if next != Some(expected) {
                return Err(ConfigError::BrokenPath { color, at: coord });
            }
        }

        by_color[color.index()] = Some(Path {
            color,
            spaces: def.spaces,
        });
    }

    let mut paths = Vec::with_capacity(PATH_COUNT);
    for (slot, color) in by_color.into_iter().zip(ALL_COLORS) {
        paths.push(slot.ok_or(ConfigError::MissingPath(color))?);
    }
    Ok(paths)
}

/// Depth-first search from START rejecting cycles and unreachable spaces.
///
/// Together with the successor-count checks this guarantees that every
/// walk from START reaches FINISH in at most `space_count` steps.
fn check_acyclic(spaces: &HashMap<Coord, Space>, start: Coord) -> Result<(), ConfigError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Open,
        Done,
    }

    let mut marks: HashMap<Coord, Mark> = HashMap::with_capacity(spaces.len());
    // (coord, index of the next successor to visit)
    let mut stack: Vec<(Coord, usize)> = vec![(start, 0)];
    marks.insert(start, Mark::Open);

    while let Some(top) = stack.last_mut() {
        let coord = top.0;
        let successors = &spaces[&coord].successors;
        if top.1 < successors.len() {
            let child = successors[top.1];
            top.1 += 1;
            match marks.get(&child) {
                Some(Mark::Open) => return Err(ConfigError::Cycle(child)),
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child, Mark::Open);
                    stack.push((child, 0));
                }
            }
        } else {
            marks.insert(coord, Mark::Done);
            stack.pop();
        }
    }

    let mut unreachable: Vec<Coord> = spaces
        .keys()
        .filter(|c| !marks.contains_key(c))
        .copied()
        .collect();
    unreachable.sort();
    match unreachable.first() {
        Some(&coord) => Err(ConfigError::Unreachable(coord)),
        None => Ok(()),
    }
}
