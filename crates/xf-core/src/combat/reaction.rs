//! Reaction fire
//!
//! An explicit pipeline stage run after any unit changes position, never
//! after stationary actions. Observers are scanned in roster order and at
//! most one fires, which keeps interrupt outcomes deterministic for a
//! given seed.

use crate::combat;
use crate::consts::{
    REACTION_ACCURACY_MULT, REACTION_SCORE_FRACTION, REACTION_TU_COST, SIGHT_RANGE,
};
use crate::mission::MissionState;
use crate::unit::UnitId;
use crate::vision;

/// Give opposing units a chance to interrupt a move
///
/// A stationary observer qualifies with enough TU for the reaction shot, a
/// loaded weapon, and an unobstructed sightline to the mover within the
/// vision radius; it fires only if its reaction score beats the required
/// fraction of the mover's. Returns the observer that fired, if any.
pub fn check_reactions(state: &mut MissionState, mover: UnitId) -> Option<UnitId> {
    let (mover_pos, mover_faction, mover_score) = {
        let mover = state.unit(mover)?;
        if !mover.is_living() {
            return None;
        }
        (mover.pos, mover.faction, mover.reaction_score())
    };

    let observers: Vec<UnitId> = state
        .units
        .iter()
        .filter(|u| u.faction == mover_faction.opposing() && u.is_living())
        .map(|u| u.id)
        .collect();

    for observer_id in observers {
        let Some(observer) = state.unit(observer_id) else {
            continue;
        };
        if observer.tu < REACTION_TU_COST || observer.weapon.ammo == 0 {
            continue;
        }
        if observer.pos.distance_sq(mover_pos) > SIGHT_RANGE * SIGHT_RANGE {
            continue;
        }
        if !vision::line_of_sight(&state.grid, observer.pos, mover_pos) {
            continue;
        }
        let score = observer.reaction_score();
        if score as f32 <= REACTION_SCORE_FRACTION * mover_score as f32 {
            continue;
        }

        let distance = observer.pos.chebyshev(mover_pos);
        let chance = combat::hit_chance(
            observer,
            observer.weapon.snap.accuracy_mult * REACTION_ACCURACY_MULT,
            distance,
            state.grid.cover_of(mover_pos),
        );
        let name = observer.name.clone();

        state.message(format!("{} snaps off a reaction shot!", name));
        if let Some(observer) = state.unit_mut(observer_id) {
            observer.spend_tu(REACTION_TU_COST);
            observer.weapon.ammo -= 1;
            if let Some(facing) = crate::unit::Facing::toward(observer.pos, mover_pos) {
                observer.facing = facing;
            }
        }
        state.resolve_shot_roll(observer_id, mover, chance);

        // sequential, not simultaneous: first qualifying unit ends the scan
        return Some(observer_id);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Pos, TerrainGrid};
    use crate::unit::UnitKind;

    fn open_state(seed: u64) -> MissionState {
        MissionState::new(TerrainGrid::open(16, 16), seed)
    }

    #[test]
    fn test_observer_with_tu_and_los_interrupts() {
        let mut state = open_state(11);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(2, 2));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(8, 2));

        // drain the mover so the observer's score wins easily
        state.unit_mut(alien).unwrap().tu = 10;

        let before = state.unit(soldier).unwrap().tu;
        let fired = check_reactions(&mut state, alien);

        assert_eq!(fired, Some(soldier));
        let observer = state.unit(soldier).unwrap();
        assert_eq!(observer.tu, before - REACTION_TU_COST);
        assert_eq!(observer.weapon.ammo, observer.weapon.max_ammo - 1);
    }

    #[test]
    fn test_low_tu_observer_stays_quiet() {
        let mut state = open_state(11);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(2, 2));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(8, 2));

        state.unit_mut(soldier).unwrap().tu = REACTION_TU_COST - 1;

        assert_eq!(check_reactions(&mut state, alien), None);
        let observer = state.unit(soldier).unwrap();
        assert_eq!(observer.weapon.ammo, observer.weapon.max_ammo);
    }

    #[test]
    fn test_outscored_observer_stays_quiet() {
        let mut state = open_state(11);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(2, 2));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(8, 2));

        // mover at full TU with the better reactions rating out-scores a
        // half-drained observer
        state.unit_mut(soldier).unwrap().tu = 13;

        assert_eq!(check_reactions(&mut state, alien), None);
        assert_eq!(state.unit(soldier).unwrap().tu, 13);
    }

    #[test]
    fn test_wall_blocks_the_interrupt() {
        let grid = TerrainGrid::from_ascii(&[
            "........",
            "...#....",
            "...#....",
            "...#....",
        ]);
        let mut state = MissionState::new(grid, 11);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(1, 1));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(6, 1));
        state.unit_mut(alien).unwrap().tu = 1;

        // ray from (1,1) to (6,1) passes the wall at (3,1)
        assert_eq!(check_reactions(&mut state, alien), None);
        let observer = state.unit(soldier).unwrap();
        assert_eq!(observer.weapon.ammo, observer.weapon.max_ammo);
    }

    #[test]
    fn test_only_first_qualifier_fires() {
        let mut state = open_state(11);
        let first = state.deploy("Vance", UnitKind::Soldier, Pos::new(2, 2));
        let second = state.deploy("Kova", UnitKind::Soldier, Pos::new(2, 4));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(8, 2));
        state.unit_mut(alien).unwrap().tu = 1;

        let fired = check_reactions(&mut state, alien);

        assert_eq!(fired, Some(first));
        let second = state.unit(second).unwrap();
        assert_eq!(second.tu, second.max_tu);
        assert_eq!(second.weapon.ammo, second.weapon.max_ammo);
    }

    #[test]
    fn test_mover_beyond_sight_range_is_safe() {
        let mut state = MissionState::new(TerrainGrid::open(40, 4), 11);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(2, 2));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(30, 2));
        state.unit_mut(alien).unwrap().tu = 1;

        // a clear ray exists, but 28 tiles is far outside the vision radius
        assert_eq!(check_reactions(&mut state, alien), None);
        let observer = state.unit(soldier).unwrap();
        assert_eq!(observer.tu, observer.max_tu);
    }

    #[test]
    fn test_empty_magazine_disqualifies() {
        let mut state = open_state(11);
        let soldier = state.deploy("Vance", UnitKind::Soldier, Pos::new(2, 2));
        let alien = state.deploy("Sectoid", UnitKind::Sectoid, Pos::new(8, 2));
        state.unit_mut(alien).unwrap().tu = 1;
        state.unit_mut(soldier).unwrap().weapon.ammo = 0;

        assert_eq!(check_reactions(&mut state, alien), None);
    }
}
