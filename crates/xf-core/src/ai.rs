//! Alien AI
//!
//! A small reactive policy, not a planner: shoot the nearest visible
//! soldier if affordable, otherwise take one greedy step toward it,
//! otherwise patrol. The mission loop invokes the policy repeatedly per
//! alien while TU remains and invocations keep making progress.

use crate::combat;
use crate::consts::SIGHT_RANGE;
use crate::mission::MissionState;
use crate::terrain::Pos;
use crate::unit::{Faction, FireKind, UnitId};
use crate::vision;

/// AI action result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    /// No action possible this invocation
    None,
    /// Stepped to a new position
    Moved(Pos),
    /// Fired at a player unit
    Fired(UnitId),
    /// Stayed put on purpose
    Waited,
}

/// Run one policy invocation for a single alien
pub fn process_alien(state: &mut MissionState, alien_id: UnitId) -> AiAction {
    let Some(alien) = state.unit(alien_id) else {
        return AiAction::None;
    };
    if !alien.is_living() {
        return AiAction::None;
    }
    let alien_pos = alien.pos;
    let alien_tu = alien.tu;
    let weapon_range = alien.weapon.range;
    let has_ammo = alien.weapon.ammo > 0;
    let snap_cost = combat::fire_tu_cost(alien.max_tu, alien.weapon.snap.tu_cost_pct);

    // Nearest living soldier this alien can currently see
    let target = state
        .units
        .iter()
        .filter(|u| u.faction == Faction::Player && u.is_living())
        .filter(|u| u.pos.distance_sq(alien_pos) <= SIGHT_RANGE * SIGHT_RANGE)
        .filter(|u| vision::line_of_sight(&state.grid, alien_pos, u.pos))
        .min_by_key(|u| (alien_pos.chebyshev(u.pos), u.id.0))
        .map(|u| (u.id, u.pos));

    let Some((target_id, target_pos)) = target else {
        return patrol(state, alien_id);
    };

    let distance = alien_pos.chebyshev(target_pos);
    if distance <= weapon_range && alien_tu >= snap_cost && has_ammo {
        if state
            .resolve_fire(alien_id, target_pos, FireKind::Snap)
            .is_ok()
        {
            return AiAction::Fired(target_id);
        }
        return AiAction::Waited;
    }

    // One greedy step, reducing the dominant axis first. No routing
    // around obstacles: an alien can wedge behind a wall, as the policy
    // intends.
    let dx = target_pos.x - alien_pos.x;
    let dy = target_pos.y - alien_pos.y;
    let step = if dx.abs() > dy.abs() {
        (dx.signum(), 0)
    } else if dy.abs() > dx.abs() {
        (0, dy.signum())
    } else {
        (dx.signum(), dy.signum())
    };
    let dest = alien_pos.offset(step.0, step.1);

    if state.grid.is_walkable(dest)
        && state.living_unit_at(dest).is_none()
        && state.resolve_move(alien_id, dest).is_ok()
    {
        return AiAction::Moved(dest);
    }

    AiAction::Waited
}

/// No visible target: wander one tile or hold position
fn patrol(state: &mut MissionState, alien_id: UnitId) -> AiAction {
    if state.rng.one_in(2) {
        return AiAction::Waited;
    }

    const DIRECTIONS: [(i32, i32); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    let (dx, dy) = DIRECTIONS[state.rng.rn2(8) as usize];

    let Some(alien) = state.unit(alien_id) else {
        return AiAction::None;
    };
    let dest = alien.pos.offset(dx, dy);

    if state.grid.is_walkable(dest)
        && state.living_unit_at(dest).is_none()
        && state.resolve_move(alien_id, dest).is_ok()
    {
        AiAction::Moved(dest)
    } else {
        AiAction::Waited
    }
}
