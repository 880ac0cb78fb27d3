//! Per-frame simulation step
//!
//! Drives the round state machine and, while playing, runs
//! input -> motion -> animation -> collision -> outcome.

use super::collision::{Hazard, Resolution, resolve};
use super::motion;
use super::state::{Facing, GameEvent, GameState, Phase};
use crate::consts::*;
use crate::dt_scale;

/// Keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    /// Any other key (only useful for "press any key" screens)
    Other,
}

impl Key {
    fn facing(self) -> Option<Facing> {
        match self {
            Key::Up => Some(Facing::Up),
            Key::Down => Some(Facing::Down),
            Key::Left => Some(Facing::Left),
            Key::Right => Some(Facing::Right),
            Key::Escape | Key::Other => None,
        }
    }
}

/// Discrete input event from the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Input events collected during one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }

    pub fn key(key: Key) -> Self {
        Self::new(vec![InputEvent::KeyDown(key)])
    }

    pub fn wants_quit(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::Quit | InputEvent::KeyDown(Key::Escape)))
    }

    pub fn any_key_down(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::KeyDown(_)))
    }

    /// Directional presses in arrival order
    pub fn hops(&self) -> impl Iterator<Item = Facing> + '_ {
        self.events.iter().filter_map(|e| match e {
            InputEvent::KeyDown(key) => key.facing(),
            _ => None,
        })
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.quit_requested {
        return;
    }
    if input.wants_quit() {
        log::info!("Quit requested");
        state.quit_requested = true;
        state.push_event(GameEvent::QuitRequested);
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time_ticks += 1;

    match state.phase {
        Phase::Start => {
            if state.gate.accept(input.any_key_down(), dt) {
                log::info!("Round started");
                state.enter(Phase::Playing);
                state.push_event(GameEvent::RoundStarted);
            }
        }

        Phase::Won | Phase::Lost => {
            if state.gate.accept(input.any_key_down(), dt) {
                state.reset_round();
                state.enter(Phase::Start);
            }
        }

        Phase::LifeLost { remaining } => {
            advance_lanes(state, dt);
            let remaining = remaining - dt;
            state.phase = if remaining <= 0.0 {
                Phase::Playing
            } else {
                Phase::LifeLost { remaining }
            };
        }

        Phase::Playing => play_frame(state, input, dt),
    }
}

/// Lane motion is the only thing that runs between lives
fn advance_lanes(state: &mut GameState, dt: f32) {
    let round = &mut state.round;
    motion::advance(
        &mut round.entities,
        round.field.width(),
        dt_scale(dt),
        dt * 1000.0,
    );
}

fn play_frame(state: &mut GameState, input: &TickInput, dt: f32) {
    let scale = dt_scale(dt);

    // Input: one tile per accepted press
    {
        let round = &mut state.round;
        for facing in input.hops() {
            round.player.try_hop(facing, &round.field);
        }
    }

    // Motion
    advance_lanes(state, dt);
    state.round.player.animation.update(dt * 1000.0);

    // Collision
    let round = &state.round;
    let resolution = resolve(
        &round.player,
        &round.entities,
        &round.goals,
        &round.zones,
        &round.field,
        scale,
    );
    apply_resolution(state, resolution);

    // Outcome: a win takes priority over a loss reached in the same frame
    if state.round.is_won() {
        log::info!("All {} goals filled", state.round.goals.len());
        state.enter(Phase::Won);
        state.push_event(GameEvent::RoundWon);
    } else if state.round.is_lost() {
        log::info!("Out of lives");
        state.enter(Phase::Lost);
        state.push_event(GameEvent::RoundLost);
    }
}

fn apply_resolution(state: &mut GameState, resolution: Resolution) {
    let round = &mut state.round;
    match resolution {
        Resolution::Clear => {}
        Resolution::Carried { dx } => {
            round.player.carry(dx, round.field.tile_size);
        }
        Resolution::Arrived { slot } => {
            round.goals[slot].fill();
            round.player.reset_to(round.home);
            log::info!(
                "Goal {} reached ({}/{})",
                slot,
                round.filled_goals(),
                round.goals.len()
            );
            state.push_event(GameEvent::GoalReached { slot });
        }
        Resolution::Hazard(hazard) => lose_life(state, hazard),
    }
}

fn lose_life(state: &mut GameState, hazard: Hazard) {
    let round = &mut state.round;
    round.player.lose_life();
    round.player.reset_to(round.home);
    let lives_left = round.player.lives;
    log::debug!("Life lost to {:?}, {} left", hazard, lives_left);

    state.push_event(GameEvent::LifeLost { hazard, lives_left });
    if lives_left > 0 {
        state.phase = Phase::LifeLost {
            remaining: RESPAWN_DELAY,
        };
    }
}
