//! Entity factory
//!
//! Fills each moving lane with its configured number of vehicles or
//! platforms, spaced `field_width / capacity` apart and staged just outside
//! the edge they enter from.

use rand_pcg::Pcg32;

use super::lane::{Lane, LaneRole};
use super::state::{EntityKind, Field, MovingEntity, VehicleClass};

/// Spawn every entity for every lane, in lane order
pub fn spawn_all(lanes: &[Lane], field: &Field, rng: &mut Pcg32) -> Vec<MovingEntity> {
    let entities: Vec<_> = lanes
        .iter()
        .enumerate()
        .flat_map(|(index, lane)| spawn_lane(index, lane, field, rng))
        .collect();
    log::debug!("Spawned {} entities across {} lanes", entities.len(), lanes.len());
    entities
}

/// Spawn one lane's entities. Goal lanes and empty lanes yield nothing.
pub fn spawn_lane(
    lane_index: usize,
    lane: &Lane,
    field: &Field,
    rng: &mut Pcg32,
) -> Vec<MovingEntity> {
    if lane.capacity == 0 {
        return Vec::new();
    }

    let spacing = field.width() / lane.capacity as f32;
    let velocity = lane.velocity();

    (0..lane.capacity)
        .filter_map(|i| {
            let kind = match &lane.role {
                LaneRole::Road { vehicle } => {
                    EntityKind::Vehicle(vehicle.unwrap_or_else(|| VehicleClass::random(rng)))
                }
                LaneRole::Water { platform } => EntityKind::Platform(*platform),
                LaneRole::Goal { .. } => return None,
            };
            let width = kind.size(field.tile_size).x;
            let offset = i as f32 * spacing;
            let x = if velocity > 0.0 {
                -width - offset
            } else {
                field.width() + offset
            };
            Some(MovingEntity::new(
                lane_index,
                lane.id,
                kind,
                velocity,
                x,
                field.tile_size,
            ))
        })
        .collect()
}
