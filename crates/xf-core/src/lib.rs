//! xf-core: Turn-based tactical combat core for Xenofront
//!
//! This crate contains the whole mission simulation with no I/O
//! dependencies: terrain and destructibility, fog of war, the TU action
//! economy, combat resolution, reaction fire, the alien policy, and the
//! turn state machine. Rendering and input live in adapter layers outside
//! this repository; they drive the simulation through the action entry
//! points on [`MissionState`] and read back snapshots, the visibility
//! grid, and the message log.

pub mod ai;
pub mod combat;
pub mod terrain;
pub mod unit;
pub mod vision;

mod consts;
mod mission;
mod rng;

pub use consts::*;
pub use mission::{ActionError, ActionMode, MissionPhase, MissionState, UnitSnapshot};
pub use rng::MissionRng;
