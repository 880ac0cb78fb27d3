//! Invariants of the lane factory, lane motion and platform riding

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use lane_hopper::GameConfig;
use lane_hopper::sim::motion::{advance, step_entity};
use lane_hopper::sim::spawn::{spawn_all, spawn_lane};
use lane_hopper::sim::{
    Direction, EntityKind, Field, GameState, Lane, LogSize, MovingEntity, Phase, PlatformKind,
    TickInput, VehicleClass, tick,
};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Left), Just(Direction::Right)]
}

fn platform() -> impl Strategy<Value = PlatformKind> {
    prop_oneof![
        Just(PlatformKind::Log(LogSize::Short)),
        Just(PlatformKind::Log(LogSize::Medium)),
        Just(PlatformKind::Log(LogSize::Long)),
        (1u8..=4).prop_map(PlatformKind::Turtles),
    ]
}

proptest! {
    #[test]
    fn factory_fills_lane_evenly(
        capacity in 1usize..8,
        speed in 0.25f32..6.0,
        dir in direction(),
        kind in platform(),
        seed in any::<u64>(),
    ) {
        let field = Field::default();
        let lane = Lane::water(3.5, kind, dir, speed, capacity);
        let spacing = field.width() / capacity as f32;
        // Only boards that pass validation
        prop_assume!(lane.widest_entity(field.tile_size).is_some_and(|w| w <= spacing));
        let entities = spawn_lane(0, &lane, &field, &mut Pcg32::seed_from_u64(seed));

        prop_assert_eq!(entities.len(), capacity);
        for pair in entities.windows(2) {
            let gap = (pair[1].x - pair[0].x).abs();
            prop_assert!((gap - spacing).abs() < 1e-3);
            // No two entities in a lane start overlapping
            let (left, right) = if pair[0].x < pair[1].x { (&pair[0], &pair[1]) } else { (&pair[1], &pair[0]) };
            prop_assert!(left.x + left.width <= right.x);
        }
        for e in &entities {
            prop_assert_eq!(e.velocity, speed * dir.sign());
            // Staged outside the visible field
            prop_assert!(e.x + e.width <= 0.0 || e.x >= field.width());
        }
    }

    #[test]
    fn wrap_lands_exactly_on_the_far_edge(
        start in -800.0f32..1400.0,
        speed in 0.25f32..8.0,
        dir in direction(),
        frames in 1usize..600,
    ) {
        let field_width = Field::default().width();
        let velocity = speed * dir.sign();
        let mut e = MovingEntity::new(
            0,
            8.5,
            EntityKind::Vehicle(VehicleClass::Sedan),
            velocity,
            start,
            60.0,
        );

        for _ in 0..frames {
            let before = e.x;
            step_entity(&mut e, field_width, 1.0);
            let moved = (e.x - (before + velocity)).abs() < 1e-3;
            let wrapped = if velocity > 0.0 {
                e.x == -e.width
            } else {
                e.x == field_width
            };
            prop_assert!(moved || wrapped, "x went {} -> {}", before, e.x);
            prop_assert_eq!(e.velocity, velocity);
        }
    }

    #[test]
    fn riding_two_platforms_averages_speed(
        s1 in 0.5f32..5.0,
        s2 in -5.0f32..5.0,
    ) {
        let mut state = GameState::new(GameConfig::default());
        state.enter(Phase::Playing);
        state.round.entities = vec![
            MovingEntity::new(3, 4.5, EntityKind::Platform(PlatformKind::Log(LogSize::Long)), s1, 0.0, 60.0),
            MovingEntity::new(3, 4.5, EntityKind::Platform(PlatformKind::Log(LogSize::Long)), s2, 320.0, 60.0),
        ];
        state.round.player.tile = Vec2::new(5.0, 4.0);
        let before = state.round.player.tile.x;

        tick(&mut state, &TickInput::default(), 1.0 / 60.0);

        let moved_px = (state.round.player.tile.x - before) * 60.0;
        prop_assert!((moved_px - (s1 + s2) / 2.0).abs() < 1e-3, "moved {}", moved_px);
        prop_assert_eq!(state.round.player.lives, 3);
    }
}

#[test]
fn lanes_keep_their_population() {
    let config = GameConfig::default();
    let mut entities = spawn_all(&config.lanes, &config.field, &mut Pcg32::seed_from_u64(1));
    let count = entities.len();
    let signs: Vec<_> = entities.iter().map(|e| e.velocity.signum()).collect();

    for _ in 0..10_000 {
        advance(&mut entities, config.field.width(), 1.0, 1000.0 / 60.0);
    }

    assert_eq!(entities.len(), count);
    let after: Vec<_> = entities.iter().map(|e| e.velocity.signum()).collect();
    assert_eq!(signs, after);
    for e in &entities {
        assert!(e.x >= -e.width - config.field.width() - 1.0);
        assert!(e.x <= 2.0 * config.field.width() + 1.0);
    }
}

#[test]
fn every_classic_lane_is_populated() {
    let config = GameConfig::default();
    let entities = spawn_all(&config.lanes, &config.field, &mut Pcg32::seed_from_u64(9));
    for (index, lane) in config.lanes.iter().enumerate() {
        let n = entities.iter().filter(|e| e.lane == index).count();
        assert_eq!(n, lane.capacity, "lane {}", lane.id);
    }
}
