//! Lane motion
//!
//! Every lane is a conveyor: entities slide at their lane velocity and are
//! recycled to the far edge once they have fully left the field.
//!
//! Per-entity order within a frame:
//! 1. Test the wrap condition against the position at the start of the frame.
//! 2. If it holds, place the entity at `-width` (rightward) or `field_width`
//!    (leftward) and skip this frame's delta.
//! 3. Otherwise advance by `velocity * dt_scale`.

use super::state::MovingEntity;

/// True once the entity is entirely past the edge it is heading for
pub fn needs_wrap(entity: &MovingEntity, field_width: f32) -> bool {
    if entity.moving_right() {
        entity.x > field_width
    } else {
        entity.x + entity.width < 0.0
    }
}

/// Re-entry position on the opposite edge
pub fn wrap_position(entity: &MovingEntity, field_width: f32) -> f32 {
    if entity.moving_right() {
        -entity.width
    } else {
        field_width
    }
}

/// Move one entity by one frame
pub fn step_entity(entity: &mut MovingEntity, field_width: f32, dt_scale: f32) {
    if needs_wrap(entity, field_width) {
        entity.x = wrap_position(entity, field_width);
    } else {
        entity.x += entity.velocity * dt_scale;
    }
}

/// Advance all entities and their display animations
pub fn advance(entities: &mut [MovingEntity], field_width: f32, dt_scale: f32, dt_ms: f32) {
    for entity in entities.iter_mut() {
        step_entity(entity, field_width, dt_scale);
        if let Some(animation) = entity.animation.as_mut() {
            animation.step(dt_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityKind, PlatformKind, VehicleClass};

    const W: f32 = 660.0;

    fn sedan(x: f32, velocity: f32) -> MovingEntity {
        MovingEntity::new(0, 7.5, EntityKind::Vehicle(VehicleClass::Sedan), velocity, x, 60.0)
    }

    #[test]
    fn test_moves_by_velocity() {
        let mut e = sedan(100.0, 3.0);
        step_entity(&mut e, W, 1.0);
        assert_eq!(e.x, 103.0);
        step_entity(&mut e, W, 0.5);
        assert_eq!(e.x, 104.5);
    }

    #[test]
    fn test_rightward_wraps_without_moving_that_frame() {
        let mut e = sedan(W + 0.5, 3.0);
        step_entity(&mut e, W, 1.0);
        assert_eq!(e.x, -77.0);
        assert!(e.velocity > 0.0);

        // Next frame moves normally from the re-entry point
        step_entity(&mut e, W, 1.0);
        assert_eq!(e.x, -74.0);
    }

    #[test]
    fn test_rightward_on_the_edge_still_moves() {
        let mut e = sedan(W, 3.0);
        step_entity(&mut e, W, 1.0);
        assert_eq!(e.x, W + 3.0);
    }

    #[test]
    fn test_leftward_wraps_to_right_edge() {
        let mut e = sedan(-78.0, -2.0);
        step_entity(&mut e, W, 1.0);
        assert_eq!(e.x, W);
        assert!(e.velocity < 0.0);
    }

    #[test]
    fn test_turtles_animate_on_wall_clock() {
        let mut entities = vec![MovingEntity::new(
            0,
            3.5,
            EntityKind::Platform(PlatformKind::Turtles(2)),
            -1.0,
            300.0,
            60.0,
        )];
        for _ in 0..14 {
            advance(&mut entities, W, 1.0, 1000.0 / 60.0);
        }
        // 14 frames at 60 Hz is ~233 ms, short of one 240 ms step
        assert_eq!(entities[0].display_frame(), 0);
        advance(&mut entities, W, 1.0, 1000.0 / 60.0);
        assert_eq!(entities[0].display_frame(), 1);
        assert_eq!(entities[0].x, 285.0);
    }
}
