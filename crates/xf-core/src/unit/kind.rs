//! Unit variants and their stat blocks
//!
//! Soldier and the alien kinds share one stat-block shape; per-kind data
//! lives in a static lookup table, not in per-kind types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Faction;
use super::weapon::WeaponSpec;

/// Per-kind stat template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStats {
    pub max_hp: i32,
    pub max_tu: u32,
    /// Base hit probability before mode and stance modifiers
    pub accuracy: f32,
    /// Reaction-fire rating; scored against current TU
    pub reactions: u32,
    /// Flat damage mitigation
    pub armor: i32,
    pub grenades: u32,
}

const SOLDIER: KindStats = KindStats {
    max_hp: 30,
    max_tu: 60,
    accuracy: 0.60,
    reactions: 50,
    armor: 2,
    grenades: 2,
};

const SECTOID: KindStats = KindStats {
    max_hp: 25,
    max_tu: 54,
    accuracy: 0.55,
    reactions: 60,
    armor: 1,
    grenades: 0,
};

const FLOATER: KindStats = KindStats {
    max_hp: 35,
    max_tu: 50,
    accuracy: 0.50,
    reactions: 45,
    armor: 3,
    grenades: 0,
};

const SNAKEMAN: KindStats = KindStats {
    max_hp: 45,
    max_tu: 45,
    accuracy: 0.58,
    reactions: 40,
    armor: 5,
    grenades: 0,
};

/// Unit variants
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum UnitKind {
    #[default]
    Soldier = 0,
    Sectoid = 1,
    Floater = 2,
    Snakeman = 3,
}

impl UnitKind {
    /// Which side this kind fights for
    pub const fn faction(&self) -> Faction {
        match self {
            UnitKind::Soldier => Faction::Player,
            UnitKind::Sectoid | UnitKind::Floater | UnitKind::Snakeman => Faction::Alien,
        }
    }

    /// The stat template for this kind
    pub const fn stats(&self) -> &'static KindStats {
        match self {
            UnitKind::Soldier => &SOLDIER,
            UnitKind::Sectoid => &SECTOID,
            UnitKind::Floater => &FLOATER,
            UnitKind::Snakeman => &SNAKEMAN,
        }
    }

    /// Standard armament for this kind
    pub fn weapon(&self) -> WeaponSpec {
        match self {
            UnitKind::Soldier => WeaponSpec::rifle(),
            UnitKind::Sectoid => WeaponSpec::plasma_pistol(),
            UnitKind::Floater => WeaponSpec::plasma_rifle(),
            UnitKind::Snakeman => WeaponSpec::plasma_rifle(),
        }
    }
}
