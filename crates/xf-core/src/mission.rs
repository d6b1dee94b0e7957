//! Mission session and turn state machine
//!
//! `MissionState` owns everything a single mission needs: the terrain
//! grid, both rosters, the fog-of-war map, the RNG, the turn state, and
//! the message log the UI reads. All rule functions receive it by
//! reference; there are no module-level singletons.
//!
//! Every rule violation is a rejection, not a panic: the request is a
//! no-op that leaves all resource pools untouched and writes a reason
//! string to the message log.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::ai::{self, AiAction};
use crate::combat::{self, grenade, reaction};
use crate::consts::{
    GRENADE_TU_COST, KNEEL_COST, STAND_COST, THROW_RANGE, WALK_COST,
};
use crate::rng::MissionRng;
use crate::terrain::{Pos, TerrainGrid};
use crate::unit::{Facing, Faction, FireKind, Unit, UnitId, UnitKind};
use crate::vision::{self, Visibility, VisibilityMap};

/// Turn state machine phases. The two mission outcomes are absorbing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum MissionPhase {
    #[default]
    PlayerTurn = 0,
    EnemyTurn = 1,
    MissionWon = 2,
    MissionLost = 3,
}

impl MissionPhase {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, MissionPhase::MissionWon | MissionPhase::MissionLost)
    }
}

/// What a tile click performs. Transient UI-adjacent state owned by the
/// player-turn controller; resets to Move each player turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ActionMode {
    #[default]
    Move = 0,
    SnapShot = 1,
    AimedShot = 2,
    AutoShot = 3,
    Grenade = 4,
}

/// Why an action request was rejected
///
/// The `Display` rendering is the user-facing reason string that lands in
/// the message log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the mission is over")]
    MissionOver,
    #[error("it is not that side's turn")]
    NotYourTurn,
    #[error("no such unit")]
    NoSuchUnit,
    #[error("that unit is down")]
    UnitDown,
    #[error("not enough time units ({needed} needed, {left} left)")]
    InsufficientTu { needed: u32, left: u32 },
    #[error("out of ammo")]
    OutOfAmmo,
    #[error("no grenades left")]
    OutOfGrenades,
    #[error("that tile cannot be entered")]
    Blocked,
    #[error("someone is already there")]
    Occupied,
    #[error("destination is not adjacent")]
    NotAdjacent,
    #[error("target is out of range")]
    OutOfRange,
    #[error("no line of fire to the target")]
    NoLineOfFire,
    #[error("no target at that tile")]
    NoTarget,
    #[error("the weapon has no such fire mode")]
    NoSuchFireMode,
}

/// Read-only roster view for the rendering layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub faction: Faction,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub tu: u32,
    pub max_tu: u32,
    pub kneeling: bool,
    pub ammo: u32,
    pub alive: bool,
}

/// A single mission: transient in-memory session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionState {
    /// Static terrain, mutated only by grenade destruction
    pub grid: TerrainGrid,

    /// Both rosters. Dead units stay listed so their names survive for
    /// messaging; the living set is exactly `hp > 0 && alive`.
    pub units: Vec<Unit>,

    /// Player-faction fog of war
    pub visibility: VisibilityMap,

    /// All combat and AI randomness
    pub rng: MissionRng,

    pub turn_number: u32,
    pub phase: MissionPhase,
    pub action_mode: ActionMode,

    /// Messages for the current turn
    #[serde(skip)]
    pub messages: Vec<String>,

    /// Permanent message history
    #[serde(skip)]
    pub message_history: Vec<String>,

    next_id: u32,
}

impl MissionState {
    /// Create an empty mission over the given terrain
    pub fn new(grid: TerrainGrid, seed: u64) -> Self {
        let visibility = VisibilityMap::new(grid.width(), grid.height());
        Self {
            grid,
            units: Vec::new(),
            visibility,
            rng: MissionRng::new(seed),
            turn_number: 1,
            phase: MissionPhase::PlayerTurn,
            action_mode: ActionMode::Move,
            messages: Vec::new(),
            message_history: Vec::new(),
            next_id: 1,
        }
    }

    /// Place a unit at mission start. Faction follows the kind.
    pub fn deploy(&mut self, name: impl Into<String>, kind: UnitKind, pos: Pos) -> UnitId {
        debug_assert!(self.grid.is_walkable(pos), "deploying onto blocked tile");
        debug_assert!(
            self.living_unit_at(pos).is_none(),
            "deploying onto an occupied tile"
        );
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.push(Unit::new(id, name, kind, pos));
        self.refresh_visibility();
        id
    }

    // ------------------------------------------------------------------
    // Lookups

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// The living unit standing on a tile, if any
    pub fn living_unit_at(&self, pos: Pos) -> Option<&Unit> {
        self.units.iter().find(|u| u.is_living() && u.pos == pos)
    }

    /// Living units of one faction, in roster order
    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.faction == faction && u.is_living())
    }

    // ------------------------------------------------------------------
    // Messages

    /// Add a message to display
    pub fn message(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.messages.push(msg.clone());
        self.message_history.push(msg);
    }

    /// Clear current-turn messages
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    // ------------------------------------------------------------------
    // Rendering-layer views

    /// Roster snapshot for drawing
    pub fn roster_snapshot(&self) -> Vec<UnitSnapshot> {
        self.units
            .iter()
            .map(|u| UnitSnapshot {
                id: u.id,
                name: u.name.clone(),
                kind: u.kind,
                faction: u.faction,
                pos: u.pos,
                hp: u.hp,
                max_hp: u.max_hp,
                tu: u.tu,
                max_tu: u.max_tu,
                kneeling: u.kneeling,
                ammo: u.weapon.ammo,
                alive: u.alive,
            })
            .collect()
    }

    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    // ------------------------------------------------------------------
    // Visibility

    /// Recompute the fog-of-war map and re-derive alien spotted flags
    pub fn refresh_visibility(&mut self) {
        self.visibility.recompute(&self.grid, &self.units);
        for unit in &mut self.units {
            if unit.faction == Faction::Alien {
                unit.spotted =
                    unit.is_living() && self.visibility.get(unit.pos) == Visibility::Visible;
            }
        }
    }

    // ------------------------------------------------------------------
    // Player action entry points
    //
    // Each wraps the internal resolver with the player-turn gate and
    // logs the rejection reason on failure.

    /// Dispatch a tile click according to the current action mode
    pub fn tile_click(&mut self, actor: UnitId, tile: Pos) -> Result<(), ActionError> {
        match self.action_mode {
            ActionMode::Move => self.move_unit(actor, tile),
            ActionMode::SnapShot => self.fire(actor, tile, FireKind::Snap),
            ActionMode::AimedShot => self.fire(actor, tile, FireKind::Aimed),
            ActionMode::AutoShot => self.fire(actor, tile, FireKind::Auto),
            ActionMode::Grenade => self.throw_grenade(actor, tile),
        }
    }

    /// Re-pick the pending action. Free: nothing is deducted until a
    /// tile click commits an action.
    pub fn set_action_mode(&mut self, mode: ActionMode) {
        self.action_mode = mode;
    }

    /// Step one tile
    pub fn move_unit(&mut self, id: UnitId, to: Pos) -> Result<(), ActionError> {
        let result = self
            .player_gate(id)
            .and_then(|()| self.resolve_move(id, to));
        self.log_rejection(&result);
        result
    }

    /// Toggle kneel/stand
    pub fn toggle_kneel(&mut self, id: UnitId) -> Result<(), ActionError> {
        let result = self
            .player_gate(id)
            .and_then(|()| self.resolve_kneel(id));
        self.log_rejection(&result);
        result
    }

    /// Fire the unit's weapon at a tile
    pub fn fire(&mut self, id: UnitId, target: Pos, kind: FireKind) -> Result<(), ActionError> {
        let result = self
            .player_gate(id)
            .and_then(|()| self.resolve_fire(id, target, kind));
        self.log_rejection(&result);
        result
    }

    /// Throw a grenade at a tile
    pub fn throw_grenade(&mut self, id: UnitId, target: Pos) -> Result<(), ActionError> {
        let result = self
            .player_gate(id)
            .and_then(|()| self.resolve_throw(id, target));
        self.log_rejection(&result);
        result
    }

    /// End the player turn and run the whole enemy turn
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        if self.phase.is_terminal() {
            let err = ActionError::MissionOver;
            self.message(err.to_string());
            return Err(err);
        }
        if self.phase != MissionPhase::PlayerTurn {
            let err = ActionError::NotYourTurn;
            self.message(err.to_string());
            return Err(err);
        }
        self.run_enemy_turn();
        Ok(())
    }

    fn player_gate(&self, id: UnitId) -> Result<(), ActionError> {
        if self.phase.is_terminal() {
            return Err(ActionError::MissionOver);
        }
        if self.phase != MissionPhase::PlayerTurn {
            return Err(ActionError::NotYourTurn);
        }
        let unit = self.unit(id).ok_or(ActionError::NoSuchUnit)?;
        if unit.faction != Faction::Player {
            return Err(ActionError::NotYourTurn);
        }
        if !unit.is_living() {
            return Err(ActionError::UnitDown);
        }
        Ok(())
    }

    fn log_rejection(&mut self, result: &Result<(), ActionError>) {
        if let Err(err) = result {
            self.message(err.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Internal resolvers, shared by the player entry points, the AI, and
    // reaction fire. No turn gating here.

    /// Commit a single tile step, then offer the opposing side its
    /// reaction-fire interrupt.
    pub(crate) fn resolve_move(&mut self, id: UnitId, to: Pos) -> Result<(), ActionError> {
        let unit = self.unit(id).ok_or(ActionError::NoSuchUnit)?;
        if !unit.is_living() {
            return Err(ActionError::UnitDown);
        }
        if !unit.pos.is_adjacent(to) {
            return Err(ActionError::NotAdjacent);
        }
        if !self.grid.is_walkable(to) {
            return Err(ActionError::Blocked);
        }
        if self.living_unit_at(to).is_some() {
            return Err(ActionError::Occupied);
        }
        if unit.tu < WALK_COST {
            return Err(ActionError::InsufficientTu {
                needed: WALK_COST,
                left: unit.tu,
            });
        }

        let from = unit.pos;
        if let Some(unit) = self.unit_mut(id) {
            unit.spend_tu(WALK_COST);
            unit.pos = to;
            if let Some(facing) = Facing::toward(from, to) {
                unit.facing = facing;
            }
        }

        self.refresh_visibility();
        reaction::check_reactions(self, id);
        Ok(())
    }

    fn resolve_kneel(&mut self, id: UnitId) -> Result<(), ActionError> {
        let unit = self.unit(id).ok_or(ActionError::NoSuchUnit)?;
        if !unit.is_living() {
            return Err(ActionError::UnitDown);
        }
        let cost = if unit.kneeling { STAND_COST } else { KNEEL_COST };
        if unit.tu < cost {
            return Err(ActionError::InsufficientTu {
                needed: cost,
                left: unit.tu,
            });
        }

        let name = unit.name.clone();
        let now_kneeling = !unit.kneeling;
        if let Some(unit) = self.unit_mut(id) {
            unit.spend_tu(cost);
            unit.kneeling = now_kneeling;
        }
        if now_kneeling {
            self.message(format!("{} kneels.", name));
        } else {
            self.message(format!("{} stands up.", name));
        }
        Ok(())
    }

    /// Resolve a fire request: all preconditions first, then an atomic
    /// commit. Ammo and TU are checked before either is touched.
    pub(crate) fn resolve_fire(
        &mut self,
        shooter_id: UnitId,
        target_pos: Pos,
        kind: FireKind,
    ) -> Result<(), ActionError> {
        let shooter = self.unit(shooter_id).ok_or(ActionError::NoSuchUnit)?;
        if !shooter.is_living() {
            return Err(ActionError::UnitDown);
        }
        let target = self
            .living_unit_at(target_pos)
            .ok_or(ActionError::NoTarget)?;
        let target_id = target.id;
        if target_id == shooter_id {
            return Err(ActionError::NoTarget);
        }

        let distance = shooter.pos.chebyshev(target_pos);
        if distance > shooter.weapon.range {
            return Err(ActionError::OutOfRange);
        }
        if !vision::line_of_sight(&self.grid, shooter.pos, target_pos) {
            return Err(ActionError::NoLineOfFire);
        }

        let profile = shooter
            .weapon
            .fire_profile(kind)
            .ok_or(ActionError::NoSuchFireMode)?;
        let cost = combat::fire_tu_cost(shooter.max_tu, profile.tu_cost_pct);
        if shooter.weapon.ammo == 0 {
            return Err(ActionError::OutOfAmmo);
        }
        if shooter.tu < cost {
            return Err(ActionError::InsufficientTu {
                needed: cost,
                left: shooter.tu,
            });
        }

        let chance = combat::hit_chance(
            shooter,
            profile.accuracy_mult,
            distance,
            self.grid.cover_of(target_pos),
        );

        if let Some(shooter) = self.unit_mut(shooter_id) {
            shooter.spend_tu(cost);
            if let Some(facing) = Facing::toward(shooter.pos, target_pos) {
                shooter.facing = facing;
            }
        }

        for _ in 0..profile.shots {
            let Some(shooter) = self.unit(shooter_id) else {
                break;
            };
            if shooter.weapon.ammo == 0 {
                break;
            }
            if let Some(shooter) = self.unit_mut(shooter_id) {
                shooter.weapon.ammo -= 1;
            }
            self.resolve_shot_roll(shooter_id, target_id, chance);
            if !self.unit(target_id).is_some_and(Unit::is_living) {
                break;
            }
        }
        Ok(())
    }

    /// One roll of an already-paid-for shot: hit or miss, damage, and
    /// the log lines. Returns whether it connected.
    pub(crate) fn resolve_shot_roll(
        &mut self,
        shooter_id: UnitId,
        target_id: UnitId,
        chance: f32,
    ) -> bool {
        let hit = self.rng.chance(chance);

        let Some(shooter) = self.unit(shooter_id) else {
            return false;
        };
        let shooter_name = shooter.name.clone();
        let weapon_damage = shooter.weapon.damage;
        let Some(target) = self.unit(target_id) else {
            return false;
        };
        let target_name = target.name.clone();
        let target_armor = target.armor;

        if !hit {
            self.message(format!("{} misses {}.", shooter_name, target_name));
            return false;
        }

        let damage = combat::damage_roll(weapon_damage, target_armor, &mut self.rng);
        self.message(format!(
            "{} hits {} for {} damage.",
            shooter_name, target_name, damage
        ));
        self.apply_damage(target_id, damage);
        true
    }

    fn resolve_throw(&mut self, id: UnitId, target: Pos) -> Result<(), ActionError> {
        let unit = self.unit(id).ok_or(ActionError::NoSuchUnit)?;
        if !unit.is_living() {
            return Err(ActionError::UnitDown);
        }
        if unit.grenades == 0 {
            return Err(ActionError::OutOfGrenades);
        }
        if unit.tu < GRENADE_TU_COST {
            return Err(ActionError::InsufficientTu {
                needed: GRENADE_TU_COST,
                left: unit.tu,
            });
        }
        if unit.pos.manhattan(target) > THROW_RANGE {
            return Err(ActionError::OutOfRange);
        }

        let from = unit.pos;
        let name = unit.name.clone();
        if let Some(unit) = self.unit_mut(id) {
            unit.spend_tu(GRENADE_TU_COST);
            unit.grenades -= 1;
            if let Some(facing) = Facing::toward(from, target) {
                unit.facing = facing;
            }
        }
        self.message(format!("{} lobs a grenade.", name));
        grenade::resolve_blast(self, target);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Damage and mission outcome

    /// Apply final damage to a unit; handles elimination bookkeeping and
    /// the immediate victory/defeat re-check.
    pub(crate) fn apply_damage(&mut self, target_id: UnitId, damage: i32) {
        let Some(target) = self.unit_mut(target_id) else {
            return;
        };
        if !target.is_living() {
            return;
        }
        target.hp -= damage;
        if target.hp > 0 {
            return;
        }

        target.alive = false;
        target.spotted = false;
        let name = target.name.clone();
        self.message(format!("{} is eliminated!", name));

        // a body on the ground no longer blocks anything; sightlines and
        // spotted flags may change
        self.refresh_visibility();
        self.check_mission_end();
    }

    /// Victory/defeat check, run after every death, not only at turn
    /// boundaries. Defeat wins a tie.
    fn check_mission_end(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        if self.living(Faction::Player).next().is_none() {
            self.phase = MissionPhase::MissionLost;
            self.message("The squad has been wiped out. Mission lost.");
        } else if self.living(Faction::Alien).next().is_none() {
            self.phase = MissionPhase::MissionWon;
            self.message("All hostiles eliminated. Mission accomplished!");
        }
    }

    // ------------------------------------------------------------------
    // Enemy turn

    /// Run the alien side, then hand control back to the player
    fn run_enemy_turn(&mut self) {
        self.phase = MissionPhase::EnemyTurn;
        self.message("Alien activity...");

        // TU resets exactly once, at the owning faction's turn start
        for unit in &mut self.units {
            if unit.faction == Faction::Alien && unit.is_living() {
                unit.reset_tu();
            }
        }

        let alien_ids: Vec<UnitId> = self
            .living(Faction::Alien)
            .map(|u| u.id)
            .collect();

        for alien_id in alien_ids {
            // the policy runs until TU is exhausted or it stops making
            // progress; dead or mission-ending states cut it short
            loop {
                if self.phase.is_terminal() {
                    return;
                }
                let Some(alien) = self.unit(alien_id) else {
                    break;
                };
                if !alien.is_living() || alien.tu == 0 {
                    break;
                }
                match ai::process_alien(self, alien_id) {
                    AiAction::None | AiAction::Waited => break,
                    AiAction::Moved(_) | AiAction::Fired(_) => {}
                }
            }
        }

        if self.phase.is_terminal() {
            return;
        }

        self.turn_number += 1;
        for unit in &mut self.units {
            if unit.faction == Faction::Player && unit.is_living() {
                unit.reset_tu();
            }
        }
        self.action_mode = ActionMode::Move;
        self.phase = MissionPhase::PlayerTurn;
        self.refresh_visibility();
        self.message(format!("Turn {}.", self.turn_number));
    }
}
