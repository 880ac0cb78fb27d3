//! Board configuration
//!
//! The lane table, field geometry and round rules. Loaded once before the
//! first round; `GameConfig::default()` is the classic board.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::lane::{Direction, Lane, LaneKind, LaneRole};
use crate::sim::state::{Field, LogSize, PlatformKind};

/// Why a configuration could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub field: Field,
    /// Player home cell in tile units
    pub home: (f32, f32),
    pub lives: u8,
    /// Seed for vehicle class selection
    #[serde(default)]
    pub seed: u64,
    pub lanes: Vec<Lane>,
}

impl Default for GameConfig {
    fn default() -> Self {
        use Direction::{Left, Right};

        let mut lanes = vec![Lane::goal(1.5, vec![1.5, 3.5, 5.5, 7.5, 9.5])];

        // River
        lanes.push(Lane::water(2.5, PlatformKind::Log(LogSize::Medium), Right, 2.0, 2));
        lanes.push(Lane::water(3.5, PlatformKind::Turtles(3), Left, 1.5, 3));
        lanes.push(Lane::water(4.5, PlatformKind::Log(LogSize::Long), Right, 1.0, 2));
        lanes.push(Lane::water(5.5, PlatformKind::Log(LogSize::Short), Left, 2.0, 3));

        // Road
        lanes.push(Lane::road(7.5, Left, 2.0, 2));
        lanes.push(Lane::road(8.5, Right, 3.0, 1));
        lanes.push(Lane::road(9.5, Left, 1.0, 2));
        lanes.push(Lane::road(10.5, Right, 1.0, 2));

        Self {
            field: Field::default(),
            home: HOME_TILE,
            lives: STARTING_LIVES,
            seed: 0,
            lanes,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {} ({} lanes)", path.display(), config.lanes.len());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn home_tile(&self) -> Vec2 {
        Vec2::new(self.home.0, self.home.1)
    }

    /// Reject boards the simulation cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        let field = &self.field;
        if field.tile_size <= 0.0 || field.cols == 0 || field.rows == 0 {
            return Err(SettingsError::Invalid("field must have a positive size".into()));
        }
        if self.lives == 0 {
            return Err(SettingsError::Invalid("lives must be at least 1".into()));
        }

        let (hx, hy) = self.home;
        if hx < 0.0 || hx >= field.cols as f32 || hy < 0.0 || hy >= field.rows as f32 {
            return Err(SettingsError::Invalid(format!(
                "home cell ({hx}, {hy}) is outside the field"
            )));
        }

        let mut slots = 0;
        for lane in &self.lanes {
            if lane.id < 0.0 || lane.id >= field.rows as f32 {
                return Err(SettingsError::Invalid(format!(
                    "lane {} is outside the field",
                    lane.id
                )));
            }
            match &lane.role {
                LaneRole::Goal { slots: xs } => {
                    if let Some(x) = xs.iter().find(|&&x| x < 0.0 || x > field.cols as f32) {
                        return Err(SettingsError::Invalid(format!(
                            "goal slot at {x} is outside the field"
                        )));
                    }
                    slots += xs.len();
                }
                LaneRole::Road { .. } | LaneRole::Water { .. } => {
                    if lane.capacity == 0 {
                        return Err(SettingsError::Invalid(format!(
                            "lane {} has no entities",
                            lane.id
                        )));
                    }
                    if lane.speed <= 0.0 {
                        return Err(SettingsError::Invalid(format!(
                            "lane {} must have a positive speed",
                            lane.id
                        )));
                    }
                    // Entities are staged one spacing apart and keep that gap
                    let spacing = field.width() / lane.capacity as f32;
                    if let Some(width) = lane.widest_entity(field.tile_size) {
                        if width > spacing {
                            return Err(SettingsError::Invalid(format!(
                                "lane {} is overcrowded: {} entities {width} px wide do not fit in {} px",
                                lane.id,
                                lane.capacity,
                                field.width()
                            )));
                        }
                    }
                }
            }
        }

        if !self.lanes.iter().any(|l| l.kind() == LaneKind::Goal) || slots == 0 {
            return Err(SettingsError::Invalid("board needs at least one goal slot".into()));
        }
        Ok(())
    }
}
