//! Fog of war
//!
//! Produces the tri-state visibility map for the player faction by
//! raycasting against the terrain grid. The map is recomputed in full,
//! never patched: simple, deterministic, and cheap at mission scale.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{AWARE_RANGE, SIGHT_RANGE};
use crate::terrain::{Pos, TerrainGrid};
use crate::unit::{Faction, Unit};

/// Per-tile visibility state
///
/// Ordered so that a max-union over observers upgrades but never
/// downgrades a tile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Visibility {
    /// Never observed
    #[default]
    Unknown = 0,
    /// Observed at some point; drawn from memory
    Explored = 1,
    /// Currently in an unobstructed sightline of a living player unit
    Visible = 2,
}

/// The player faction's tri-state fog-of-war map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityMap {
    width: i32,
    height: i32,
    states: Vec<Visibility>,
}

impl VisibilityMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            states: vec![Visibility::Unknown; (width * height) as usize],
        }
    }

    pub fn get(&self, pos: Pos) -> Visibility {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return Visibility::Unknown;
        }
        self.states[(pos.y * self.width + pos.x) as usize]
    }

    /// Upgrade-only write; explored tiles never regress to unknown
    fn raise(&mut self, pos: Pos, state: Visibility) {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return;
        }
        let idx = (pos.y * self.width + pos.x) as usize;
        if state > self.states[idx] {
            self.states[idx] = state;
        }
    }

    /// Recompute the whole map from the living player units
    ///
    /// Current visibility is rebuilt from scratch (visible drops back to
    /// explored first), then every living player unit casts rays over its
    /// surroundings. One unit seeing a tile is sufficient. Tiles inside
    /// the awareness radius but without a clear ray are marked explored
    /// only, the dimmer fog tier.
    pub fn recompute(&mut self, grid: &TerrainGrid, units: &[Unit]) {
        for state in &mut self.states {
            if *state == Visibility::Visible {
                *state = Visibility::Explored;
            }
        }

        for unit in units {
            if unit.faction != Faction::Player || !unit.is_living() {
                continue;
            }
            self.raise(unit.pos, Visibility::Visible);

            for dy in -AWARE_RANGE..=AWARE_RANGE {
                for dx in -AWARE_RANGE..=AWARE_RANGE {
                    let target = unit.pos.offset(dx, dy);
                    if !grid.in_bounds(target) {
                        continue;
                    }
                    let d2 = dx * dx + dy * dy;
                    if d2 <= SIGHT_RANGE * SIGHT_RANGE
                        && line_of_sight(grid, unit.pos, target)
                    {
                        self.raise(target, Visibility::Visible);
                    } else if d2 <= AWARE_RANGE * AWARE_RANGE {
                        self.raise(target, Visibility::Explored);
                    }
                }
            }
        }
    }
}

/// Check for an unobstructed sightline between two tiles (Bresenham)
///
/// A sight-blocking tile can itself be seen, but nothing beyond it.
pub fn line_of_sight(grid: &TerrainGrid, from: Pos, to: Pos) -> bool {
    let mut x = from.x;
    let mut y = from.y;

    let dx = (to.x - x).abs();
    let dy = -(to.y - y).abs();
    let sx = if x < to.x { 1 } else { -1 };
    let sy = if y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x != from.x || y != from.y {
            let here = Pos::new(x, y);
            if grid.blocks_sight(here) {
                // The blocking tile is the last thing the ray reaches
                return x == to.x && y == to.y;
            }
        }

        if x == to.x && y == to.y {
            return true;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
