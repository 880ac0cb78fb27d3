//! Lane Hopper - a lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, motion, collisions, round state)
//! - `renderer`: Render surface seam and the per-frame draw pass
//! - `platform`: Tick source and input source
//! - `settings`: Data-driven board configuration
//! - `game_loop`: Fixed-rate input -> update -> draw loop

pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{GameConfig, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the frame loop
    pub const TARGET_FPS: f32 = 60.0;
    /// Largest elapsed time a single frame may report (seconds).
    /// Long stalls are capped so the simulation never jumps ahead.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Classic board: 11 x 13 tiles of 60 px
    pub const TILE_SIZE: f32 = 60.0;
    pub const FIELD_COLS: u32 = 11;
    pub const FIELD_ROWS: u32 = 13;

    /// Player home cell (tile units)
    pub const HOME_TILE: (f32, f32) = (5.0, 11.0);
    pub const STARTING_LIVES: u8 = 3;
    /// Player hitbox (idle frame size, pixels)
    pub const PLAYER_WIDTH: f32 = 45.0;
    pub const PLAYER_HEIGHT: f32 = 31.0;

    /// Player hop animation: frame count and wall-clock interval per frame
    pub const PLAYER_FRAMES: u8 = 6;
    pub const PLAYER_FRAME_MS: f32 = 16.0;

    /// Turtle paddling animation
    pub const TURTLE_FRAMES: u8 = 3;
    pub const TURTLE_FRAME_MS: f32 = 240.0;

    /// Goal slot box is a quarter tile, centred slightly below the goal row centre
    pub const GOAL_SLOT_FRACTION: f32 = 0.25;
    pub const GOAL_SLOT_ROW_OFFSET: f32 = 0.6;

    /// Pause after losing a life before play resumes (seconds)
    pub const RESPAWN_DELAY: f32 = 1.0;
    /// Key presses are ignored for this long after a screen is entered (seconds)
    pub const SCREEN_GRACE: f32 = 0.25;
}

/// Convert an elapsed frame time into the motion scale (1.0 at the target rate)
#[inline]
pub fn dt_scale(dt_secs: f32) -> f32 {
    dt_secs * consts::TARGET_FPS
}

/// Pixel centre of a tile-unit position
#[inline]
pub fn tile_center_px(tile: Vec2, tile_size: f32) -> Vec2 {
    tile * tile_size + Vec2::splat(tile_size * 0.5)
}
