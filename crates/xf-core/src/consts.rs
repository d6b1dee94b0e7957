//! Rule constants for the mission simulation.
//!
//! Every tuning value the rule engine uses lives here so a balance pass
//! touches exactly one file.

/// Vision radius in tiles. A tile is visible only if an unobstructed ray
/// can be traced to it within this distance.
pub const SIGHT_RANGE: i32 = 12;

/// Awareness radius. Tiles inside it are marked explored (dim fog tier)
/// even without a clear sightline, but never visible.
pub const AWARE_RANGE: i32 = 16;

/// TU cost of a single tile step. All walkable terrain shares one class.
pub const WALK_COST: u32 = 4;

/// TU cost to drop to a kneel.
pub const KNEEL_COST: u32 = 4;

/// TU cost to stand back up. Deliberately pricier than kneeling.
pub const STAND_COST: u32 = 8;

/// Accuracy multiplier while kneeling.
pub const KNEEL_ACCURACY_MULT: f32 = 1.15;

/// Flat TU cost of throwing a grenade.
pub const GRENADE_TU_COST: u32 = 20;

/// Maximum grenade throw distance (Manhattan).
pub const THROW_RANGE: i32 = 10;

/// Grenade blast radius (Manhattan).
pub const BLAST_RADIUS: i32 = 2;

/// Grenade damage at the blast center, before falloff.
pub const GRENADE_DAMAGE: u32 = 50;

/// TU threshold to be eligible for reaction fire, and the cost of the
/// reaction shot itself.
pub const REACTION_TU_COST: u32 = 12;

/// An observer reacts only if its reaction score exceeds this fraction of
/// the mover's score.
pub const REACTION_SCORE_FRACTION: f32 = 0.5;

/// Accuracy multiplier applied on top of the snap profile for a reaction
/// shot.
pub const REACTION_ACCURACY_MULT: f32 = 0.75;

/// Hit chance lost per tile of Chebyshev distance to the target.
pub const RANGE_PENALTY_PER_TILE: f32 = 0.02;

/// Hit chance lost per point of cover on the target's tile.
pub const COVER_PENALTY: f32 = 0.3;

/// Hit chance clamp. No shot is a guaranteed hit or a guaranteed miss.
pub const HIT_CHANCE_FLOOR: f32 = 0.05;
pub const HIT_CHANCE_CEIL: f32 = 0.95;

/// Damage roll multiplier range: raw damage is weapon damage scaled by a
/// uniform draw from this interval.
pub const DAMAGE_ROLL_MIN: f32 = 0.5;
pub const DAMAGE_ROLL_MAX: f32 = 2.0;

/// Cover value a destructible tile retains once reduced to rubble.
pub const RUBBLE_COVER: f32 = 0.1;
