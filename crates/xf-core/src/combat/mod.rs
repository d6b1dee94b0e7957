//! Combat rule engine
//!
//! Pure functions over borrowed combatants plus the mission RNG. Action
//! orchestration (who may act, when, and what it writes to the log) lives
//! on the mission session; the numbers live here.

pub mod grenade;
pub mod reaction;

use crate::consts::{
    COVER_PENALTY, DAMAGE_ROLL_MAX, DAMAGE_ROLL_MIN, HIT_CHANCE_CEIL, HIT_CHANCE_FLOOR,
    KNEEL_ACCURACY_MULT, RANGE_PENALTY_PER_TILE,
};
use crate::rng::MissionRng;
use crate::unit::Unit;

/// TU cost of a shot: a percentage of the firer's max TU
pub fn fire_tu_cost(max_tu: u32, tu_cost_pct: f32) -> u32 {
    (max_tu as f32 * tu_cost_pct).floor() as u32
}

/// Probability that one shot connects
///
/// Base accuracy scaled by the fire mode, improved by kneeling, reduced
/// linearly by distance and by cover on the target's tile, clamped so no
/// outcome is ever certain.
pub fn hit_chance(shooter: &Unit, mode_accuracy_mult: f32, distance: i32, cover: f32) -> f32 {
    let mut chance = shooter.accuracy * mode_accuracy_mult;
    if shooter.kneeling {
        chance *= KNEEL_ACCURACY_MULT;
    }
    chance -= RANGE_PENALTY_PER_TILE * distance as f32;
    chance -= COVER_PENALTY * cover;
    chance.clamp(HIT_CHANCE_FLOOR, HIT_CHANCE_CEIL)
}

/// Roll damage for a connected shot
///
/// Weapon damage scaled by a wide uniform multiplier, mitigated by armor,
/// floored at 1 so a hit always costs something.
pub fn damage_roll(weapon_damage: u32, target_armor: i32, rng: &mut MissionRng) -> i32 {
    let raw = weapon_damage as f32 * rng.factor(DAMAGE_ROLL_MIN, DAMAGE_ROLL_MAX);
    (raw.floor() as i32 - target_armor).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HIT_CHANCE_CEIL, HIT_CHANCE_FLOOR};
    use crate::terrain::Pos;
    use crate::unit::{UnitId, UnitKind};
    use proptest::prelude::*;

    fn shooter() -> Unit {
        Unit::new(UnitId(1), "Vance", UnitKind::Soldier, Pos::new(0, 0))
    }

    #[test]
    fn test_snap_cost_scales_with_max_tu() {
        // 60 max TU at 25% is exactly 15
        assert_eq!(fire_tu_cost(60, 0.25), 15);
        assert_eq!(fire_tu_cost(48, 0.25), 12);
    }

    #[test]
    fn test_kneeling_improves_the_odds() {
        let mut unit = shooter();
        let standing = hit_chance(&unit, 1.0, 5, 0.0);
        unit.kneeling = true;
        let kneeling = hit_chance(&unit, 1.0, 5, 0.0);
        assert!(kneeling > standing);
    }

    #[test]
    fn test_distance_and_cover_hurt() {
        let unit = shooter();
        let close = hit_chance(&unit, 1.0, 2, 0.0);
        let far = hit_chance(&unit, 1.0, 14, 0.0);
        assert!(far < close);

        let exposed = hit_chance(&unit, 1.0, 5, 0.0);
        let covered = hit_chance(&unit, 1.0, 5, 0.6);
        assert!(covered < exposed);
    }

    #[test]
    fn test_point_blank_is_still_not_certain() {
        let mut unit = shooter();
        unit.accuracy = 0.99;
        unit.kneeling = true;
        let chance = hit_chance(&unit, 1.5, 0, 0.0);
        assert_eq!(chance, HIT_CHANCE_CEIL);
    }

    proptest! {
        #[test]
        fn prop_hit_chance_always_clamped(
            accuracy in 0.0f32..1.5,
            mode_mult in 0.0f32..2.0,
            kneeling: bool,
            distance in 0i32..40,
            cover in 0.0f32..1.0,
        ) {
            let mut unit = shooter();
            unit.accuracy = accuracy;
            unit.kneeling = kneeling;
            let chance = hit_chance(&unit, mode_mult, distance, cover);
            prop_assert!((HIT_CHANCE_FLOOR..=HIT_CHANCE_CEIL).contains(&chance));
        }

        #[test]
        fn prop_damage_never_below_one(
            weapon_damage in 1u32..120,
            armor in 0i32..500,
            seed: u64,
        ) {
            let mut rng = MissionRng::new(seed);
            prop_assert!(damage_roll(weapon_damage, armor, &mut rng) >= 1);
        }

        #[test]
        fn prop_damage_bounded_by_roll_range(
            weapon_damage in 1u32..120,
            seed: u64,
        ) {
            let mut rng = MissionRng::new(seed);
            let dmg = damage_roll(weapon_damage, 0, &mut rng);
            prop_assert!(dmg >= (weapon_damage as f32 * 0.5).floor() as i32 - 1);
            prop_assert!(dmg <= (weapon_damage as f32 * 2.0).ceil() as i32);
        }
    }
}
