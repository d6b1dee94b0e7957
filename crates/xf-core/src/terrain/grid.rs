//! The mission tile grid

use serde::{Deserialize, Serialize};

use super::{Pos, Tile};

/// Static per-mission tile map
///
/// Out-of-bounds queries resolve to "blocked" rather than failing, which
/// keeps hit-scan and AI code branch-free at map edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TerrainGrid {
    /// Create an all-open grid
    pub fn open(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            tiles: vec![Tile::open(); (width * height) as usize],
        }
    }

    /// Build a grid from ASCII rows: `.` open, `#` wall, `+` crate,
    /// `~` fence, `,` rubble. Rows must be non-empty and equal length.
    pub fn from_ascii(rows: &[&str]) -> Self {
        assert!(!rows.is_empty(), "map needs at least one row");
        let width = rows[0].len() as i32;
        let height = rows.len() as i32;
        let mut grid = Self::open(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as i32, width, "ragged map row {}", y);
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '.' => Tile::open(),
                    '#' => Tile::wall(),
                    '+' => Tile::crate_(),
                    '~' => Tile::fence(),
                    ',' => Tile::rubble(),
                    other => panic!("unknown map glyph {:?}", other),
                };
                grid.set(Pos::new(x as i32, y as i32), tile);
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Get the tile at a position, None out of bounds
    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        if self.in_bounds(pos) {
            Some(&self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    /// Replace a tile. Used by mission setup; simulation code mutates
    /// terrain only through `destroy`.
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.tiles[idx] = tile;
        }
    }

    /// Out of bounds is not walkable
    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(Tile::is_walkable)
    }

    /// Out of bounds blocks sight
    pub fn blocks_sight(&self, pos: Pos) -> bool {
        self.tile(pos).is_none_or(Tile::blocks_sight)
    }

    /// Out of bounds offers no cover
    pub fn cover_of(&self, pos: Pos) -> f32 {
        self.tile(pos).map_or(0.0, |t| t.cover)
    }

    /// Reduce a destructible tile to rubble. Idempotent: no-op on
    /// non-destructible tiles, already-rubble tiles, and out-of-bounds
    /// positions.
    pub fn destroy(&mut self, pos: Pos) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx].demolish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TileKind;

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = TerrainGrid::open(8, 8);
        assert!(!grid.is_walkable(Pos::new(-1, 0)));
        assert!(!grid.is_walkable(Pos::new(8, 0)));
        assert!(grid.blocks_sight(Pos::new(0, -1)));
        assert_eq!(grid.cover_of(Pos::new(100, 100)), 0.0);
    }

    #[test]
    fn test_from_ascii() {
        let grid = TerrainGrid::from_ascii(&[
            "....",
            ".#+.",
            ".~..",
        ]);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert!(!grid.is_walkable(Pos::new(1, 1)));
        assert_eq!(grid.tile(Pos::new(2, 1)).unwrap().kind, TileKind::Crate);
        assert!(grid.blocks_sight(Pos::new(1, 2)));
        assert!(grid.is_walkable(Pos::new(0, 0)));
    }

    #[test]
    fn test_destroy_only_touches_destructibles() {
        let mut grid = TerrainGrid::from_ascii(&["#+."]);

        grid.destroy(Pos::new(0, 0));
        assert_eq!(grid.tile(Pos::new(0, 0)).unwrap().kind, TileKind::Wall);

        grid.destroy(Pos::new(1, 0));
        assert_eq!(grid.tile(Pos::new(1, 0)).unwrap().kind, TileKind::Rubble);

        grid.destroy(Pos::new(2, 0));
        assert_eq!(grid.tile(Pos::new(2, 0)).unwrap().kind, TileKind::Open);

        // off the map: nothing to do, nothing to panic about
        grid.destroy(Pos::new(40, 40));
    }
}
