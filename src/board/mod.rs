//! Board representation and player types.
//!
//! Contains the coordinate-keyed board graph, the standard layout, and the
//! player, role and resource types the rest of the engine mutates.

pub mod graph;
pub mod layout;
pub mod player;
pub mod space;

pub use graph::{Board, BoardContent, Path, PathDef};
pub use player::{
    Player, PlayerId, ResourceKind, Resources, Role, RoleMap, ALL_RESOURCES, ALL_ROLES,
    RESOURCE_COUNT, ROLE_COUNT,
};
pub use space::{Coord, PathColor, Space, SpaceKind, ALL_COLORS, PATH_COUNT};
