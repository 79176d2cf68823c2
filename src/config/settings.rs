use crate::domain::model::{ScreenPoint, TerrainMode};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_finite, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// Layout and generation parameters of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    pub chunk_size: i64,
    pub render_distance: i64,
    pub master_seed: i64,
    pub terrain_mode: TerrainMode,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            tile_width: 128.0,
            tile_height: 64.0,
            chunk_size: 16,
            render_distance: 4,
            master_seed: 12345,
            terrain_mode: TerrainMode::Quantum,
        }
    }
}

impl WorldConfig {
    /// Where the runner and the camera start: the middle of the first screen.
    pub fn spawn_point(&self) -> ScreenPoint {
        ScreenPoint::new(self.screen_width / 2.0, self.screen_height / 2.0)
    }

    /// Number of chunks kept alive around the focus.
    pub fn window_chunks(&self) -> usize {
        let side = (2 * self.render_distance + 1) as usize;
        side * side
    }
}

impl Validate for WorldConfig {
    fn validate(&self) -> Result<()> {
        validate_range("world.screen_width", self.screen_width, 1.0, 16384.0)?;
        validate_range("world.screen_height", self.screen_height, 1.0, 16384.0)?;
        validate_range("world.tile_width", self.tile_width, 1.0, 4096.0)?;
        validate_range("world.tile_height", self.tile_height, 1.0, 4096.0)?;
        validate_range("world.chunk_size", self.chunk_size, 1, 256)?;
        validate_range("world.render_distance", self.render_distance, 0, 32)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Forward speed in pixels per tick.
    pub speed: f64,
    /// Radians per tick while a turn key is held.
    pub turn_speed: f64,
    pub scale: f64,
    /// Half the side of the runner's square hitbox before scaling.
    pub half_extent: f64,
    pub initial_direction: f64,
    pub ticks_per_frame: u32,
    pub frames: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            turn_speed: 0.1,
            scale: 1.0,
            half_extent: 16.0,
            initial_direction: FRAC_PI_4,
            ticks_per_frame: 6,
            frames: 8,
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<()> {
        validate_range("runner.speed", self.speed, 0.0, 1024.0)?;
        validate_range("runner.turn_speed", self.turn_speed, 0.0, std::f64::consts::PI)?;
        validate_range("runner.scale", self.scale, 0.01, 100.0)?;
        validate_range("runner.half_extent", self.half_extent, 0.5, 1024.0)?;
        validate_finite("runner.initial_direction", self.initial_direction)?;
        validate_positive_number("runner.ticks_per_frame", self.ticks_per_frame, 1)?;
        validate_positive_number("runner.frames", self.frames, 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub name: String,
    pub player: String,
    pub max_ticks: u64,
    pub ticks_per_second: u32,
    /// Sleep between ticks to run in real time instead of as fast as possible.
    pub paced: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            name: "forest-run".to_string(),
            player: "player".to_string(),
            max_ticks: 3600,
            ticks_per_second: 60,
            paced: false,
        }
    }
}

impl Validate for SessionSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("session.name", &self.name)?;
        validate_non_empty_string("session.player", &self.player)?;
        validate_positive_number("session.max_ticks", self.max_ticks, 1)?;
        validate_range("session.ticks_per_second", self.ticks_per_second, 1, 1000)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    pub enabled: bool,
    pub file: String,
    pub capacity: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            file: "leaderboard.json".to_string(),
            capacity: 10,
        }
    }
}

impl Validate for LeaderboardSettings {
    fn validate(&self) -> Result<()> {
        if self.enabled {
            validate_path("leaderboard.file", &self.file)?;
            validate_positive_number("leaderboard.capacity", self.capacity, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(WorldConfig::default().validate().is_ok());
        assert!(RunnerConfig::default().validate().is_ok());
        assert!(SessionSettings::default().validate().is_ok());
        assert!(LeaderboardSettings::default().validate().is_ok());
    }

    #[test]
    fn test_default_window_is_nine_by_nine() {
        let world = WorldConfig::default();
        assert_eq!(world.window_chunks(), 81);
        assert_eq!(world.spawn_point(), ScreenPoint::new(640.0, 360.0));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let world = WorldConfig {
            chunk_size: 0,
            ..WorldConfig::default()
        };
        assert!(world.validate().is_err());

        let runner = RunnerConfig {
            frames: 0,
            ..RunnerConfig::default()
        };
        assert!(runner.validate().is_err());

        let board = LeaderboardSettings {
            enabled: true,
            capacity: 0,
            ..LeaderboardSettings::default()
        };
        assert!(board.validate().is_err());
    }
}
