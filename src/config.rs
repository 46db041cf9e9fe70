//! Tunable game parameters.
//!
//! Every field has a default, so a JSON config file only needs the keys it
//! wants to change.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::tallest_debris_field;
use crate::entities::Debris;
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in world units.
    pub width: f32,
    /// Playfield height in world units.
    pub height: f32,
    /// Hit points the world starts each round with.
    pub max_hit_points: u32,
    /// Frames between shots while Fire is held.
    pub fire_cooldown: u32,
    /// Frames between single debris drops.
    pub spawn_interval: u64,
    /// A debris field drops every `spawn_interval * field_interval_multiplier`
    /// frames.
    pub field_interval_multiplier: u64,
    /// Frame rate the driver caps the loop at.
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            max_hit_points: 10,
            fire_cooldown: 15,
            spawn_interval: 60,
            field_interval_multiplier: 10,
            fps: 60,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero counts and intervals, and playfields too small for a
    /// debris field to fit inside the top quarter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "playfield must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width < Debris::FIELD_SIZE.x {
            return Err(ConfigError::Invalid(format!(
                "width must be at least {} to fit a debris piece, got {}",
                Debris::FIELD_SIZE.x,
                self.width
            )));
        }
        let tallest =
            tallest_debris_field(self.width).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.height / 4.0 < tallest {
            return Err(ConfigError::Invalid(format!(
                "height must be at least {} for debris fields on a playfield {} wide, got {}",
                tallest * 4.0,
                self.width,
                self.height
            )));
        }
        if self.max_hit_points == 0 {
            return Err(ConfigError::Invalid("max_hit_points must be at least 1".into()));
        }
        if self.fire_cooldown == 0 {
            return Err(ConfigError::Invalid("fire_cooldown must be at least 1".into()));
        }
        if self.spawn_interval == 0 || self.field_interval_multiplier == 0 {
            return Err(ConfigError::Invalid("spawn intervals must be at least 1".into()));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be at least 1".into()));
        }
        Ok(())
    }

    /// Frames between debris fields.
    pub fn field_interval(&self) -> u64 {
        self.spawn_interval.saturating_mul(self.field_interval_multiplier)
    }
}
