//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes in as an argument, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (lane order, then spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lane;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Hazard, Resolution, resolve};
pub use lane::{Direction, Lane, LaneKind, LaneRole, Zones};
pub use state::{
    EntityKind, Facing, Field, GameEvent, GameState, GoalSlot, LogSize, MovingEntity, Phase,
    PlatformKind, Player, Round, VehicleClass,
};
pub use tick::{InputEvent, Key, TickInput, tick};
