//! Rendering module
//!
//! The simulation never draws. Each frame, [`draw_game`] walks the state and
//! asks a [`RenderSurface`] to draw sprites at pixel positions; the surface
//! decides what a sprite looks like.

pub mod terminal;

pub use terminal::TerminalSurface;

use anyhow::Result;
use glam::Vec2;

use crate::sim::{EntityKind, Facing, GameState, LogSize, Phase, PlatformKind, Round, VehicleClass};

/// Background of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Bushes,
    Water,
    Road,
    /// Safe ground (median and home row)
    Verge,
}

/// Visual state of something to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite {
    Ground(Terrain),
    Vehicle { class: VehicleClass, facing_right: bool },
    Log(LogSize),
    Turtles { frame: u8 },
    /// Open goal slot
    Goal,
    /// Frog sitting in a filled slot
    Landed,
    Player { facing: Facing, frame: u8 },
}

/// Something that can show a frame
pub trait RenderSurface {
    fn begin_frame(&mut self) -> Result<()>;
    /// Draw a sprite covering the pixel rectangle `[min, min + size)`
    fn draw(&mut self, sprite: Sprite, min: Vec2, size: Vec2);
    /// Draw a line of text centred on a pixel position
    fn text(&mut self, center: Vec2, text: &str);
    fn end_frame(&mut self) -> Result<()>;
}

/// Terrain of a row, from the round's zones
pub fn terrain_for_row(round: &Round, row: i32) -> Terrain {
    let zones = &round.zones;
    if zones.in_bushes(row) {
        Terrain::Bushes
    } else if zones.in_water(row) {
        Terrain::Water
    } else if zones.road.as_ref().is_some_and(|r| r.contains(&row)) {
        Terrain::Road
    } else {
        Terrain::Verge
    }
}

/// Draw one frame of the current phase
pub fn draw_game(surface: &mut dyn RenderSurface, state: &GameState) -> Result<()> {
    surface.begin_frame()?;

    let field = state.round.field;
    let center_x = field.width() / 2.0;
    let third = field.height() / 3.0;
    let half = field.height() / 2.0;

    match state.phase {
        Phase::Start => {
            surface.text(Vec2::new(center_x, third), "LANE HOPPER");
            surface.text(Vec2::new(center_x, half), "Press any key to start");
        }
        Phase::Won => {
            surface.text(Vec2::new(center_x, third), "ALL HOME!");
            surface.text(Vec2::new(center_x, half), "Press any key to play again");
            surface.text(Vec2::new(center_x, half + field.tile_size), "Press 'ESC' to quit");
        }
        Phase::Lost => {
            surface.text(Vec2::new(center_x, third), "GAME OVER");
            surface.text(Vec2::new(center_x, half), "Press any key to restart");
            surface.text(Vec2::new(center_x, half + field.tile_size), "Press 'ESC' to quit");
        }
        Phase::Playing | Phase::LifeLost { .. } => draw_board(surface, &state.round),
    }

    surface.end_frame()
}

fn draw_board(surface: &mut dyn RenderSurface, round: &Round) {
    let field = round.field;
    let tile = field.tile_size;

    for row in 0..field.rows as i32 {
        surface.draw(
            Sprite::Ground(terrain_for_row(round, row)),
            Vec2::new(0.0, row as f32 * tile),
            Vec2::new(field.width(), tile),
        );
    }

    for goal in &round.goals {
        let sprite = if goal.filled { Sprite::Landed } else { Sprite::Goal };
        let aabb = goal.aabb();
        surface.draw(sprite, aabb.min, aabb.max - aabb.min);
    }

    // Platforms first so traffic and the player sit on top
    let (platforms, vehicles): (Vec<_>, Vec<_>) =
        round.entities.iter().partition(|e| e.kind.is_platform());
    for entity in platforms.into_iter().chain(vehicles) {
        let sprite = match entity.kind {
            EntityKind::Vehicle(class) => Sprite::Vehicle {
                class,
                facing_right: entity.moving_right(),
            },
            EntityKind::Platform(PlatformKind::Log(size)) => Sprite::Log(size),
            EntityKind::Platform(PlatformKind::Turtles(_)) => Sprite::Turtles {
                frame: entity.display_frame(),
            },
        };
        let aabb = entity.aabb();
        surface.draw(sprite, aabb.min, aabb.max - aabb.min);
    }

    let player = &round.player;
    let hitbox = player.hitbox(tile);
    surface.draw(
        Sprite::Player {
            facing: player.facing,
            frame: player.animation.frame,
        },
        hitbox.min,
        hitbox.max - hitbox.min,
    );

    // HUD on the bottom strip
    let hud = format!(
        "Lives: {}   Home: {}/{}",
        player.lives,
        round.filled_goals(),
        round.goals.len()
    );
    surface.text(
        Vec2::new(field.width() / 2.0, field.height() - tile / 2.0),
        &hud,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;

    /// Records draw calls instead of showing them
    #[derive(Default)]
    struct Recorder {
        sprites: Vec<Sprite>,
        text: Vec<String>,
        frames: usize,
    }

    impl RenderSurface for Recorder {
        fn begin_frame(&mut self) -> Result<()> {
            self.sprites.clear();
            self.text.clear();
            Ok(())
        }

        fn draw(&mut self, sprite: Sprite, _min: Vec2, _size: Vec2) {
            self.sprites.push(sprite);
        }

        fn text(&mut self, _center: Vec2, text: &str) {
            self.text.push(text.to_string());
        }

        fn end_frame(&mut self) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    #[test]
    fn test_title_screen_prompts() {
        let state = GameState::new(GameConfig::default());
        let mut surface = Recorder::default();
        draw_game(&mut surface, &state).unwrap();

        assert!(surface.sprites.is_empty());
        assert!(surface.text.iter().any(|t| t.contains("Press any key")));
        assert_eq!(surface.frames, 1);
    }

    #[test]
    fn test_board_draws_everything_once() {
        let mut state = GameState::new(GameConfig::default());
        state.enter(Phase::Playing);
        state.round.goals[1].filled = true;
        let mut surface = Recorder::default();
        draw_game(&mut surface, &state).unwrap();

        let count = |f: fn(&Sprite) -> bool| surface.sprites.iter().filter(|s| f(s)).count();
        assert_eq!(count(|s| matches!(s, Sprite::Player { .. })), 1);
        assert_eq!(count(|s| matches!(s, Sprite::Landed)), 1);
        assert_eq!(count(|s| matches!(s, Sprite::Goal)), 4);
        assert_eq!(count(|s| matches!(s, Sprite::Ground(_))), 13);
        let moving = count(|s| {
            matches!(
                s,
                Sprite::Vehicle { .. } | Sprite::Log(_) | Sprite::Turtles { .. }
            )
        });
        assert_eq!(moving, state.round.entities.len());
        assert_eq!(surface.text, vec!["Lives: 3   Home: 1/5".to_string()]);
    }

    #[test]
    fn test_row_terrain() {
        let state = GameState::new(GameConfig::default());
        let round = &state.round;
        assert_eq!(terrain_for_row(round, 1), Terrain::Bushes);
        assert_eq!(terrain_for_row(round, 3), Terrain::Water);
        assert_eq!(terrain_for_row(round, 6), Terrain::Verge);
        assert_eq!(terrain_for_row(round, 9), Terrain::Road);
        assert_eq!(terrain_for_row(round, 11), Terrain::Verge);
    }
}
