//! The standard four-path board.
//!
//! Each path is listed from its first space to its last; the last space
//! leads to FINISH and START leads to the first space of every path. The
//! only links not implied by path order are the choicepoint crossings in
//! `CROSSINGS`. Every crossing jumps from index `i` on one path to index
//! `i + 1` on another, so progress along the board is strictly increasing
//! and the graph cannot contain a cycle. All data is compile-time `static`.

use super::graph::{BoardContent, PathDef};
use super::space::{Coord, PathColor, Space, SpaceKind, ALL_COLORS};

/// Number of spaces on each colored path.
pub const PATH_LENGTH: usize = 14;

/// The shared START junction.
pub const START: Coord = Coord::new(300, 540);

/// The shared FINISH junction.
pub const FINISH: Coord = Coord::new(700, 140);

const R: SpaceKind = SpaceKind::Regular;
const D: SpaceKind = SpaceKind::Draw;
const C: SpaceKind = SpaceKind::Choicepoint;

const fn at(x: i32, y: i32, kind: SpaceKind) -> (Coord, SpaceKind) {
    (Coord::new(x, y), kind)
}

static PURPLE: [(Coord, SpaceKind); PATH_LENGTH] = [
    at(321, 518, R),
    at(348, 491, R),
    at(375, 464, D),
    at(402, 437, R),
    at(429, 410, R),
    at(456, 383, D),
    at(483, 356, R),
    at(510, 329, R),
    at(537, 302, C),
    at(566, 273, R),
    at(589, 246, R),
    at(618, 221, D),
    at(645, 194, R),
    at(672, 167, R),
];

static ORANGE: [(Coord, SpaceKind); PATH_LENGTH] = [
    at(361, 558, R),
    at(388, 531, R),
    at(415, 504, D),
    at(442, 477, R),
    at(469, 450, C),
    at(496, 423, D),
    at(523, 396, R),
    at(550, 369, R),
    at(577, 342, D),
    at(604, 315, R),
    at(631, 288, C),
    at(658, 261, D),
    at(685, 234, R),
    at(712, 207, R),
];

static GREEN: [(Coord, SpaceKind); PATH_LENGTH] = [
    at(401, 598, R),
    at(428, 571, D),
    at(455, 544, R),
    at(482, 517, R),
    at(509, 490, D),
    at(536, 463, R),
    at(563, 436, C),
    at(590, 409, R),
    at(617, 382, D),
    at(644, 355, R),
    at(671, 328, R),
    at(698, 301, D),
    at(725, 274, R),
    at(752, 247, R),
];

static BLUE: [(Coord, SpaceKind); PATH_LENGTH] = [
    at(441, 638, R),
    at(468, 611, R),
    at(495, 584, D),
    at(522, 557, C),
    at(549, 530, R),
    at(576, 503, D),
    at(603, 476, R),
    at(630, 449, R),
    at(657, 422, D),
    at(684, 395, R),
    at(711, 368, R),
    at(738, 341, D),
    at(765, 314, R),
    at(792, 287, R),
];

/// Choicepoint crossings: (choicepoint, branch onto another path).
///
/// The same-color continuation is always listed first among a
/// choicepoint's successors; these branches follow it.
pub static CROSSINGS: [(Coord, Coord); 5] = [
    // purple 8 -> orange 9
    (Coord::new(537, 302), Coord::new(604, 315)),
    // orange 4 -> purple 5
    (Coord::new(469, 450), Coord::new(456, 383)),
    // orange 10 -> green 11
    (Coord::new(631, 288), Coord::new(698, 301)),
    // green 6 -> blue 7
    (Coord::new(563, 436), Coord::new(630, 449)),
    // blue 3 -> green 4
    (Coord::new(522, 557), Coord::new(509, 490)),
];

/// Returns the ordered spaces of a path on the standard board.
pub fn path_spaces(color: PathColor) -> &'static [(Coord, SpaceKind); PATH_LENGTH] {
    match color {
        PathColor::Purple => &PURPLE,
        PathColor::Orange => &ORANGE,
        PathColor::Green => &GREEN,
        PathColor::Blue => &BLUE,
    }
}

/// Builds the board content for the standard board.
pub fn standard() -> BoardContent {
    let mut spaces = Vec::with_capacity(PATH_LENGTH * ALL_COLORS.len() + 2);
    let mut paths = Vec::with_capacity(ALL_COLORS.len());

    spaces.push(Space::new(
        START,
        None,
        SpaceKind::Start,
        ALL_COLORS.iter().map(|&c| path_spaces(c)[0].0).collect(),
    ));

    for &color in &ALL_COLORS {
        let table = path_spaces(color);
        for (i, &(coord, kind)) in table.iter().enumerate() {
            let next = table.get(i + 1).map(|&(c, _)| c).unwrap_or(FINISH);
            let mut successors = vec![next];
            successors.extend(
                CROSSINGS
                    .iter()
                    .filter(|(from, _)| *from == coord)
                    .map(|&(_, to)| to),
            );
            spaces.push(Space::new(coord, Some(color), kind, successors));
        }
        paths.push(PathDef {
            color,
            spaces: table.iter().map(|&(c, _)| c).collect(),
        });
    }

    spaces.push(Space::new(FINISH, None, SpaceKind::Finish, Vec::new()));

    BoardContent { spaces, paths }
}
