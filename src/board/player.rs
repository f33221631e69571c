//! Players, roles, and resource pools.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::space::{Coord, PathColor};

/// Number of playable roles.
pub const ROLE_COUNT: usize = 4;

/// A player's archetype. Decides which branch of a card's effect applies
/// and which path the player starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    Colonialist = 0,
    Historian = 1,
    Activist = 2,
    Investor = 3,
}

/// All roles in assignment order.
pub const ALL_ROLES: [Role; ROLE_COUNT] = [
    Role::Colonialist,
    Role::Historian,
    Role::Activist,
    Role::Investor,
];

impl Role {
    pub const fn name(self) -> &'static str {
        match self {
            Role::Colonialist => "colonialist",
            Role::Historian => "historian",
            Role::Activist => "activist",
            Role::Investor => "investor",
        }
    }

    /// Looks up a role by name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Role> {
        ALL_ROLES
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(s))
    }

    /// The path a player with this role commits to at game start.
    pub const fn home_path(self) -> PathColor {
        match self {
            Role::Colonialist => PathColor::Purple,
            Role::Historian => PathColor::Orange,
            Role::Activist => PathColor::Green,
            Role::Investor => PathColor::Blue,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value for every role, indexed by `Role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap<T>([T; ROLE_COUNT]);

impl<T> RoleMap<T> {
    pub fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        RoleMap([
            f(Role::Colonialist),
            f(Role::Historian),
            f(Role::Activist),
            f(Role::Investor),
        ])
    }

    /// Builds the map, stopping at the first role `f` cannot fill.
    pub fn try_from_fn<E>(mut f: impl FnMut(Role) -> Result<T, E>) -> Result<Self, E> {
        Ok(RoleMap([
            f(Role::Colonialist)?,
            f(Role::Historian)?,
            f(Role::Activist)?,
            f(Role::Investor)?,
        ]))
    }

    pub fn get(&self, role: Role) -> &T {
        &self.0[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        ALL_ROLES.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<Role> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        &self.0[role.index()]
    }
}

/// Number of resource kinds.
pub const RESOURCE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ResourceKind {
    Money = 0,
    Knowledge = 1,
    Influence = 2,
}

pub const ALL_RESOURCES: [ResourceKind; RESOURCE_COUNT] = [
    ResourceKind::Money,
    ResourceKind::Knowledge,
    ResourceKind::Influence,
];

impl ResourceKind {
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Money => "money",
            ResourceKind::Knowledge => "knowledge",
            ResourceKind::Influence => "influence",
        }
    }

    pub fn from_name(s: &str) -> Option<ResourceKind> {
        ALL_RESOURCES
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player's resource pool. Quantities are signed and unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resources {
    pub money: i64,
    pub knowledge: i64,
    pub influence: i64,
}

impl Resources {
    /// A pool with every kind set to `value`.
    pub const fn uniform(value: i64) -> Self {
        Resources {
            money: value,
            knowledge: value,
            influence: value,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> i64 {
        self[kind]
    }
}

impl Index<ResourceKind> for Resources {
    type Output = i64;

    fn index(&self, kind: ResourceKind) -> &i64 {
        match kind {
            ResourceKind::Money => &self.money,
            ResourceKind::Knowledge => &self.knowledge,
            ResourceKind::Influence => &self.influence,
        }
    }
}

impl IndexMut<ResourceKind> for Resources {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut i64 {
        match kind {
            ResourceKind::Money => &mut self.money,
            ResourceKind::Knowledge => &mut self.knowledge,
            ResourceKind::Influence => &mut self.influence,
        }
    }
}

/// Seat index of a player, written `p0`, `p1`, ... in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub position: Coord,
    /// The path the player is committed to.
    pub path: PathColor,
    /// Branch picked at a choicepoint with no budget left to step onto it.
    pub branch: Option<Coord>,
    pub resources: Resources,
    pub human: bool,
    pub finished: bool,
    /// 1-based arrival order at FINISH.
    pub rank: Option<u32>,
}

impl Player {
    /// Creates a player standing on `start`, committed to the role's home path.
    pub fn new(id: PlayerId, name: impl Into<String>, role: Role, start: Coord, human: bool) -> Self {
        Player {
            id,
            name: name.into(),
            role,
            position: start,
            path: role.home_path(),
            branch: None,
            resources: Resources::default(),
            human,
            finished: false,
            rank: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names() {
        for r in &ALL_ROLES {
            assert_eq!(Role::from_name(r.name()), Some(*r));
        }
        assert_eq!(Role::from_name("Colonialist"), Some(Role::Colonialist));
        assert_eq!(Role::from_name("pirate"), None);
    }

    #[test]
    fn roles_have_distinct_home_paths() {
        let mut homes: Vec<PathColor> = ALL_ROLES.iter().map(|r| r.home_path()).collect();
        homes.sort();
        homes.dedup();
        assert_eq!(homes.len(), ROLE_COUNT);
    }

    #[test]
    fn role_map_lookup() {
        let map = RoleMap::from_fn(|r| r.name().len());
        assert_eq!(map[Role::Historian], "historian".len());
        assert_eq!(*map.get(Role::Investor), "investor".len());
        assert_eq!(map.iter().count(), ROLE_COUNT);
    }

    #[test]
    fn role_map_try_from_fn_stops_at_first_error() {
        let result: Result<RoleMap<u8>, Role> = RoleMap::try_from_fn(|r| {
            if r == Role::Activist {
                Err(r)
            } else {
                Ok(1)
            }
        });
        assert_eq!(result, Err(Role::Activist));
    }

    #[test]
    fn resources_index_by_kind() {
        let mut res = Resources::uniform(2);
        res[ResourceKind::Knowledge] -= 7;
        assert_eq!(res.money, 2);
        assert_eq!(res.get(ResourceKind::Knowledge), -5);
        assert_eq!(res.influence, 2);
    }

    #[test]
    fn resources_json_uses_kind_names() {
        let json = serde_json::to_string(&Resources::uniform(0)).unwrap();
        assert_eq!(json, r#"{"money":0,"knowledge":0,"influence":0}"#);
    }

    #[test]
    fn new_player_starts_on_home_path() {
        let p = Player::new(PlayerId(2), "Ada", Role::Activist, Coord::new(0, 0), true);
        assert_eq!(p.path, PathColor::Green);
        assert_eq!(p.id.to_string(), "p2");
        assert!(!p.finished);
        assert_eq!(p.resources, Resources::default());
    }
}
