//! Grenade blasts and destructible terrain
//!
//! The only path that mutates terrain after mission start. Damage falls
//! off linearly with Manhattan distance and spares nobody: friendly fire
//! is possible and intended.

use crate::consts::{BLAST_RADIUS, GRENADE_DAMAGE};
use crate::mission::MissionState;
use crate::terrain::Pos;
use crate::unit::UnitId;

/// Damage dealt at a given Manhattan distance from the blast center
///
/// Linear falloff; zero outside the radius, never zero at the edge tile
/// for the mission grenade charge.
pub fn blast_damage(base_damage: u32, dist: i32) -> u32 {
    if dist > BLAST_RADIUS || dist < 0 {
        return 0;
    }
    let falloff = 1.0 - dist as f32 / (BLAST_RADIUS + 1) as f32;
    (base_damage as f32 * falloff).floor() as u32
}

/// Resolve a grenade detonation at the target tile
///
/// Every living unit in the radius takes falloff damage, every
/// destructible tile in the radius is leveled, and visibility is
/// recomputed once at the end since sightlines may have opened.
pub fn resolve_blast(state: &mut MissionState, center: Pos) {
    let victims: Vec<(UnitId, i32)> = state
        .units
        .iter()
        .filter(|u| u.is_living())
        .map(|u| (u.id, u.pos.manhattan(center)))
        .filter(|(_, dist)| *dist <= BLAST_RADIUS)
        .collect();

    for (id, dist) in victims {
        let damage = blast_damage(GRENADE_DAMAGE, dist) as i32;
        if damage == 0 {
            continue;
        }
        if let Some(victim) = state.unit(id) {
            let name = victim.name.clone();
            state.message(format!("{} is caught in the blast for {} damage.", name, damage));
        }
        state.apply_damage(id, damage);
    }

    for dy in -BLAST_RADIUS..=BLAST_RADIUS {
        for dx in -BLAST_RADIUS..=BLAST_RADIUS {
            if dx.abs() + dy.abs() > BLAST_RADIUS {
                continue;
            }
            state.grid.destroy(center.offset(dx, dy));
        }
    }

    state.refresh_visibility();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRENADE_TU_COST;
    use crate::terrain::{TerrainGrid, TileKind};
    use crate::unit::UnitKind;
    use proptest::prelude::*;

    #[test]
    fn test_falloff_scenario() {
        // base 50, radius 2: center 50, edge floor(50/3) = 16, outside 0
        assert_eq!(blast_damage(50, 0), 50);
        assert_eq!(blast_damage(50, 1), 33);
        assert_eq!(blast_damage(50, 2), 16);
        assert_eq!(blast_damage(50, 3), 0);
    }

    #[test]
    fn test_center_strictly_exceeds_edge() {
        assert!(blast_damage(GRENADE_DAMAGE, 0) > blast_damage(GRENADE_DAMAGE, BLAST_RADIUS));
        assert!(blast_damage(GRENADE_DAMAGE, BLAST_RADIUS) > 0);
    }

    proptest! {
        #[test]
        fn prop_falloff_is_monotone(base in 1u32..200, near in 0i32..=2, far in 0i32..=2) {
            prop_assume!(near <= far);
            prop_assert!(blast_damage(base, near) >= blast_damage(base, far));
        }

        #[test]
        fn prop_nothing_beyond_radius(base in 1u32..200, dist in 3i32..50) {
            prop_assert_eq!(blast_damage(base, dist), 0);
        }
    }

    #[test]
    fn test_blast_levels_terrain_and_spares_nobody() {
        let grid = TerrainGrid::from_ascii(&[
            "........",
            "...+....",
            "........",
            "........",
        ]);
        let mut state = MissionState::new(grid, 7);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(1, 1));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(5, 1));

        resolve_blast(&mut state, Pos::new(3, 1));

        // the crate is rubble now
        assert_eq!(
            state.grid.tile(Pos::new(3, 1)).unwrap().kind,
            TileKind::Rubble
        );

        // both sides took edge damage: no faction exemption
        let soldier = state.unit(soldier).unwrap();
        let alien = state.unit(alien).unwrap();
        assert_eq!(soldier.hp, soldier.max_hp - 16);
        assert_eq!(alien.hp, alien.max_hp - 16);
        assert!(soldier.is_living() && alien.is_living());
    }

    #[test]
    fn test_blast_opens_sightlines() {
        use crate::vision::Visibility;

        let grid = TerrainGrid::from_ascii(&[
            "#######",
            "#..~..#",
            "#######",
        ]);
        let mut state = MissionState::new(grid, 4);
        let _soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(1, 1));

        // the fence hides the far side of the corridor
        assert_ne!(state.visibility.get(Pos::new(5, 1)), Visibility::Visible);

        resolve_blast(&mut state, Pos::new(3, 1));

        assert_eq!(
            state.grid.tile(Pos::new(3, 1)).unwrap().kind,
            TileKind::Rubble
        );
        assert_eq!(state.visibility.get(Pos::new(5, 1)), Visibility::Visible);
    }

    #[test]
    fn test_throw_spends_grenade_then_detonates() {
        let mut state = MissionState::new(TerrainGrid::open(12, 12), 3);
        let thrower = state.deploy("Kova", UnitKind::Soldier, Pos::new(1, 1));

        state.throw_grenade(thrower, Pos::new(6, 1)).unwrap();

        let unit = state.unit(thrower).unwrap();
        assert_eq!(unit.grenades, unit.kind.stats().grenades - 1);
        assert_eq!(unit.tu, unit.max_tu - GRENADE_TU_COST);
    }
}
