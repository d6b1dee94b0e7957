//! Combat units
//!
//! A unit is a mutable combat entity owned by one faction's roster. It is
//! created at mission start and marked dead (never deleted) when its HP
//! reaches zero, so its name stays available for messaging.

mod kind;
mod weapon;

pub use kind::{KindStats, UnitKind};
pub use weapon::{BurstMode, FireKind, FireMode, FireProfile, WeaponSpec};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::terrain::Pos;

/// Unique identifier for unit instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// The two sides of a mission
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Faction {
    #[default]
    Player = 0,
    Alien = 1,
}

impl Faction {
    pub const fn opposing(&self) -> Faction {
        match self {
            Faction::Player => Faction::Alien,
            Faction::Alien => Faction::Player,
        }
    }
}

/// Eight-way facing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Facing {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    #[default]
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Facing {
    /// Get the delta (dx, dy) for this facing
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::NorthEast => (1, -1),
            Facing::East => (1, 0),
            Facing::SouthEast => (1, 1),
            Facing::South => (0, 1),
            Facing::SouthWest => (-1, 1),
            Facing::West => (-1, 0),
            Facing::NorthWest => (-1, -1),
        }
    }

    /// Facing from a step delta; None for a zero delta
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Facing::North),
            (1, -1) => Some(Facing::NorthEast),
            (1, 0) => Some(Facing::East),
            (1, 1) => Some(Facing::SouthEast),
            (0, 1) => Some(Facing::South),
            (-1, 1) => Some(Facing::SouthWest),
            (-1, 0) => Some(Facing::West),
            (-1, -1) => Some(Facing::NorthWest),
            _ => None,
        }
    }

    /// Facing that looks from one tile toward another
    pub const fn toward(from: Pos, to: Pos) -> Option<Self> {
        Self::from_delta(to.x - from.x, to.y - from.y)
    }
}

/// A combat entity: soldier or alien variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub faction: Faction,
    pub pos: Pos,
    pub facing: Facing,
    pub hp: i32,
    pub max_hp: i32,
    pub tu: u32,
    pub max_tu: u32,
    /// Stance flag only; kneeling units shoot straighter
    pub kneeling: bool,
    pub accuracy: f32,
    pub reactions: u32,
    pub armor: i32,
    pub weapon: WeaponSpec,
    pub grenades: u32,
    pub alive: bool,
    /// Derived every visibility pass; aliens only
    pub spotted: bool,
}

impl Unit {
    /// Create a unit of the given kind with full resource pools
    pub fn new(id: UnitId, name: impl Into<String>, kind: UnitKind, pos: Pos) -> Self {
        let stats = kind.stats();
        Self {
            id,
            name: name.into(),
            kind,
            faction: kind.faction(),
            pos,
            facing: Facing::default(),
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            tu: stats.max_tu,
            max_tu: stats.max_tu,
            kneeling: false,
            accuracy: stats.accuracy,
            reactions: stats.reactions,
            armor: stats.armor,
            weapon: kind.weapon(),
            grenades: stats.grenades,
            alive: true,
            spotted: false,
        }
    }

    /// The living set is exactly the units with positive HP still flagged
    /// alive
    pub fn is_living(&self) -> bool {
        self.alive && self.hp > 0
    }

    /// Deduct TU for a committed action
    pub fn spend_tu(&mut self, cost: u32) {
        debug_assert!(self.tu >= cost, "action committed without TU cover");
        self.tu = self.tu.saturating_sub(cost);
    }

    /// Refill TU at the owning faction's turn start
    pub fn reset_tu(&mut self) {
        self.tu = self.max_tu;
    }

    /// Reaction score: reactions rating weighted by remaining TU
    pub fn reaction_score(&self) -> u32 {
        self.reactions * self.tu
    }
}
