//! Collision and zone resolution
//!
//! Runs once per playing frame, after motion. Checks happen in a fixed
//! order (goal, bushes, traffic, water) and the first decisive result wins,
//! so a frame can cost at most one life.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lane::Zones;
use super::state::{Field, GoalSlot, MovingEntity, Player};

/// Axis-aligned box in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// What cost the player a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hazard {
    /// Landed on the goal row outside an open slot
    Bushes,
    /// Hit by traffic
    Vehicle,
    /// In the river with nothing to stand on
    Drowned,
    /// Carried off the edge of the field by a platform
    SweptAway,
}

/// Outcome of one frame's collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Nothing happened
    Clear,
    /// Player reached an open goal slot (index into the goal list)
    Arrived { slot: usize },
    /// Player is riding; shift by this many pixels
    Carried { dx: f32 },
    Hazard(Hazard),
}

/// Index of the first open goal slot the player overlaps
pub fn goal_arrival(hitbox: &Aabb, goals: &[GoalSlot]) -> Option<usize> {
    goals
        .iter()
        .position(|g| !g.filled && hitbox.intersects(&g.aabb()))
}

/// Whether any vehicle overlaps the player
pub fn hit_by_vehicle(hitbox: &Aabb, entities: &[MovingEntity]) -> bool {
    entities
        .iter()
        .filter(|e| e.kind.is_vehicle())
        .any(|e| hitbox.intersects(&e.aabb()))
}

/// Average velocity of every platform under the player, if any
pub fn ride_velocity(hitbox: &Aabb, entities: &[MovingEntity]) -> Option<f32> {
    let (sum, count) = entities
        .iter()
        .filter(|e| e.kind.is_platform() && hitbox.intersects(&e.aabb()))
        .fold((0.0, 0u32), |(sum, count), e| (sum + e.velocity, count + 1));

    (count > 0).then(|| sum / count as f32)
}

/// Resolve the player against the board for one frame
pub fn resolve(
    player: &Player,
    entities: &[MovingEntity],
    goals: &[GoalSlot],
    zones: &Zones,
    field: &Field,
    dt_scale: f32,
) -> Resolution {
    let hitbox = player.hitbox(field.tile_size);
    let row = player.row();

    if let Some(slot) = goal_arrival(&hitbox, goals) {
        return Resolution::Arrived { slot };
    }

    if zones.in_bushes(row) {
        return Resolution::Hazard(Hazard::Bushes);
    }

    if hit_by_vehicle(&hitbox, entities) {
        return Resolution::Hazard(Hazard::Vehicle);
    }

    if zones.in_water(row) {
        let Some(velocity) = ride_velocity(&hitbox, entities) else {
            return Resolution::Hazard(Hazard::Drowned);
        };
        let dx = velocity * dt_scale;

        let center_x = hitbox.center().x + dx;
        if center_x < 0.0 || center_x > field.width() {
            return Resolution::Hazard(Hazard::SweptAway);
        }
        return Resolution::Carried { dx };
    }

    Resolution::Clear
}
