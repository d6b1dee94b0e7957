//! Map tiles

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::RUBBLE_COVER;

/// Terrain classes a mission map is built from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TileKind {
    /// Open ground
    #[default]
    Open = 0,
    /// Solid structural wall
    Wall = 1,
    /// Low destructible cover (crates, sandbags); can be stood on
    Crate = 2,
    /// Tall destructible obstruction that blocks sight until demolished
    Fence = 3,
    /// What a destructible tile becomes after a blast
    Rubble = 4,
}

bitflags! {
    /// Tile capability flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        const WALKABLE = 0x01;
        const BLOCKS_SIGHT = 0x02;
        const DESTRUCTIBLE = 0x04;
    }
}

/// A single map tile
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain class
    pub kind: TileKind,

    /// Capability flags (raw; read through the accessors)
    pub flags: u8,

    /// Cover value in 0..1, subtracted from hit chances against an
    /// occupant of this tile
    pub cover: f32,
}

impl Tile {
    /// Open ground
    pub const fn open() -> Self {
        Self {
            kind: TileKind::Open,
            flags: TileFlags::WALKABLE.bits(),
            cover: 0.0,
        }
    }

    /// Structural wall: impassable, opaque, indestructible
    pub const fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
            flags: TileFlags::BLOCKS_SIGHT.bits(),
            cover: 0.0,
        }
    }

    /// Low cover that a blast can level
    pub const fn crate_() -> Self {
        Self {
            kind: TileKind::Crate,
            flags: TileFlags::WALKABLE.bits() | TileFlags::DESTRUCTIBLE.bits(),
            cover: 0.6,
        }
    }

    /// Sight-blocking destructible obstruction
    pub const fn fence() -> Self {
        Self {
            kind: TileKind::Fence,
            flags: TileFlags::WALKABLE.bits()
                | TileFlags::BLOCKS_SIGHT.bits()
                | TileFlags::DESTRUCTIBLE.bits(),
            cover: 0.4,
        }
    }

    /// Leveled remains of a destructible tile
    pub const fn rubble() -> Self {
        Self {
            kind: TileKind::Rubble,
            flags: TileFlags::WALKABLE.bits(),
            cover: RUBBLE_COVER,
        }
    }

    fn tile_flags(&self) -> TileFlags {
        TileFlags::from_bits_truncate(self.flags)
    }

    pub fn is_walkable(&self) -> bool {
        self.tile_flags().contains(TileFlags::WALKABLE)
    }

    pub fn blocks_sight(&self) -> bool {
        self.tile_flags().contains(TileFlags::BLOCKS_SIGHT)
    }

    pub fn is_destructible(&self) -> bool {
        self.tile_flags().contains(TileFlags::DESTRUCTIBLE)
    }

    /// Convert to rubble. Walkable stays true, cover drops to the rubble
    /// constant, destructible and sight-block clear. No-op on anything
    /// that is not destructible.
    pub fn demolish(&mut self) {
        if !self.is_destructible() {
            return;
        }
        *self = Tile::rubble();
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_capabilities() {
        assert!(Tile::open().is_walkable());
        assert!(!Tile::open().blocks_sight());

        assert!(!Tile::wall().is_walkable());
        assert!(Tile::wall().blocks_sight());
        assert!(!Tile::wall().is_destructible());

        assert!(Tile::crate_().is_destructible());
        assert!(Tile::fence().blocks_sight());
        assert!(Tile::fence().is_destructible());
    }

    #[test]
    fn test_demolish_converts_to_rubble() {
        let mut tile = Tile::fence();
        tile.demolish();

        assert_eq!(tile.kind, TileKind::Rubble);
        assert!(tile.is_walkable());
        assert!(!tile.blocks_sight());
        assert!(!tile.is_destructible());
        assert_eq!(tile.cover, RUBBLE_COVER);
    }

    #[test]
    fn test_demolish_is_idempotent() {
        let mut tile = Tile::crate_();
        tile.demolish();
        let after_first = tile;
        tile.demolish();
        assert_eq!(tile.kind, after_first.kind);
        assert_eq!(tile.cover, after_first.cover);
    }

    #[test]
    fn test_demolish_ignores_walls() {
        let mut tile = Tile::wall();
        tile.demolish();
        assert_eq!(tile.kind, TileKind::Wall);
    }
}
