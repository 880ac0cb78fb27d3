//! Frame loop
//!
//! One thread, one frame at a time: wait for the tick, poll input, step the
//! simulation, then draw. A quit request is honoured before the next draw.

use anyhow::Result;

use crate::platform::{InputSource, TickSource};
use crate::renderer::{RenderSurface, draw_game};
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Summary of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub rounds_won: u32,
    pub rounds_lost: u32,
}

/// Run until the player quits
pub fn run(
    state: &mut GameState,
    surface: &mut dyn RenderSurface,
    input: &mut dyn InputSource,
    clock: &mut dyn TickSource,
) -> Result<RunStats> {
    let mut stats = RunStats::default();

    loop {
        let dt = clock.tick();
        let events = input.poll()?;
        tick(state, &TickInput::new(events), dt);

        for event in state.drain_events() {
            match event {
                GameEvent::RoundWon => stats.rounds_won += 1,
                GameEvent::RoundLost => stats.rounds_lost += 1,
                _ => {}
            }
            log::debug!("{:?}", event);
        }

        if state.quit_requested {
            break;
        }

        draw_game(surface, state)?;
        stats.frames += 1;
    }

    log::info!(
        "Session over after {} frames ({} won, {} lost)",
        stats.frames,
        stats.rounds_won,
        stats.rounds_lost
    );
    Ok(stats)
}
