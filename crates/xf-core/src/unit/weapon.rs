//! Weapon specifications and fire modes

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Which trigger profile a shot request uses
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum FireKind {
    /// Quick, cheap, baseline accuracy
    #[default]
    Snap = 0,
    /// Slow, expensive, most accurate
    Aimed = 1,
    /// Burst of independent shots at reduced accuracy
    Auto = 2,
}

/// A single-shot trigger profile
///
/// TU cost is a percentage of the firer's max TU, so the same weapon is
/// proportionally cheaper for a faster unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireMode {
    pub tu_cost_pct: f32,
    pub accuracy_mult: f32,
}

/// Burst trigger profile: one TU payment, several independent rolls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstMode {
    pub tu_cost_pct: f32,
    pub accuracy_mult: f32,
    pub shots: u32,
}

/// Resolved cost/accuracy/volume for one fire request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireProfile {
    pub tu_cost_pct: f32,
    pub accuracy_mult: f32,
    pub shots: u32,
}

/// A unit's weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    /// Base damage before the roll multiplier and armor
    pub damage: u32,
    pub max_ammo: u32,
    pub ammo: u32,
    /// Maximum firing distance (Chebyshev)
    pub range: i32,
    pub snap: FireMode,
    pub aimed: FireMode,
    /// Not every weapon can burst
    pub auto: Option<BurstMode>,
}

impl WeaponSpec {
    /// Standard-issue ballistic rifle
    pub fn rifle() -> Self {
        Self {
            name: "rifle".into(),
            damage: 30,
            max_ammo: 20,
            ammo: 20,
            range: 18,
            snap: FireMode {
                tu_cost_pct: 0.25,
                accuracy_mult: 1.0,
            },
            aimed: FireMode {
                tu_cost_pct: 0.50,
                accuracy_mult: 1.4,
            },
            auto: Some(BurstMode {
                tu_cost_pct: 0.35,
                accuracy_mult: 0.7,
                shots: 3,
            }),
        }
    }

    /// Single-shot heavy gun, few rounds
    pub fn heavy_cannon() -> Self {
        Self {
            name: "heavy cannon".into(),
            damage: 56,
            max_ammo: 6,
            ammo: 6,
            range: 14,
            snap: FireMode {
                tu_cost_pct: 0.33,
                accuracy_mult: 0.85,
            },
            aimed: FireMode {
                tu_cost_pct: 0.80,
                accuracy_mult: 1.3,
            },
            auto: None,
        }
    }

    /// Sidearm carried by sectoids
    pub fn plasma_pistol() -> Self {
        Self {
            name: "plasma pistol".into(),
            damage: 26,
            max_ammo: 26,
            ammo: 26,
            range: 12,
            snap: FireMode {
                tu_cost_pct: 0.18,
                accuracy_mult: 0.9,
            },
            aimed: FireMode {
                tu_cost_pct: 0.45,
                accuracy_mult: 1.3,
            },
            auto: None,
        }
    }

    /// Mainline alien weapon
    pub fn plasma_rifle() -> Self {
        Self {
            name: "plasma rifle".into(),
            damage: 40,
            max_ammo: 28,
            ammo: 28,
            range: 20,
            snap: FireMode {
                tu_cost_pct: 0.30,
                accuracy_mult: 1.0,
            },
            aimed: FireMode {
                tu_cost_pct: 0.60,
                accuracy_mult: 1.5,
            },
            auto: Some(BurstMode {
                tu_cost_pct: 0.40,
                accuracy_mult: 0.65,
                shots: 3,
            }),
        }
    }

    /// Look up the profile for a fire kind; None if the weapon lacks the
    /// mode (auto on a single-shot weapon)
    pub fn fire_profile(&self, kind: FireKind) -> Option<FireProfile> {
        match kind {
            FireKind::Snap => Some(FireProfile {
                tu_cost_pct: self.snap.tu_cost_pct,
                accuracy_mult: self.snap.accuracy_mult,
                shots: 1,
            }),
            FireKind::Aimed => Some(FireProfile {
                tu_cost_pct: self.aimed.tu_cost_pct,
                accuracy_mult: self.aimed.accuracy_mult,
                shots: 1,
            }),
            FireKind::Auto => self.auto.map(|burst| FireProfile {
                tu_cost_pct: burst.tu_cost_pct,
                accuracy_mult: burst.accuracy_mult,
                shots: burst.shots,
            }),
        }
    }
}
