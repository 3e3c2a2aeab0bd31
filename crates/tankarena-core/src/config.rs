//! Arena configuration.
//!
//! [`ArenaConfig`] gathers every tunable the board and registry read:
//! tank extent, per-archetype tank parameters, bullet parameters and the
//! default level dimensions. All fields have defaults, so a JSON document
//! only needs to name what it overrides.
//!
//! # Example
//!
//! ```
//! use tankarena_core::config::ArenaConfig;
//! use tankarena_core::entity::TankType;
//!
//! let config = ArenaConfig::from_json_str(r#"{ "bullet": { "speed": 1.0 } }"#).unwrap();
//! assert!((config.bullet.speed - 1.0).abs() < f32::EPSILON);
//! assert_eq!(config.tanks.get(TankType::Armor).health, 4);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::TankType;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid configuration JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Parameters for one tank archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankParams {
    /// Starting hit points.
    pub health: u32,
    /// Tiles per movement step.
    pub speed: f32,
    /// Movement steps between shots.
    pub fire_cooldown: u32,
    /// Score awarded for destroying this archetype.
    pub points: u32,
}

impl TankParams {
    const fn new(health: u32, speed: f32, fire_cooldown: u32, points: u32) -> Self {
        Self {
            health,
            speed,
            fire_cooldown,
            points,
        }
    }
}

impl Default for TankParams {
    fn default() -> Self {
        Self::new(1, 0.125, 8, 100)
    }
}

/// Per-archetype tank parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankRoster {
    /// Player tank.
    pub player: TankParams,
    /// Basic enemy.
    pub basic: TankParams,
    /// Fast enemy.
    pub fast: TankParams,
    /// Power enemy.
    pub power: TankParams,
    /// Armoured enemy.
    pub armor: TankParams,
}

impl TankRoster {
    /// Parameters for `tank_type`.
    #[must_use]
    pub const fn get(&self, tank_type: TankType) -> &TankParams {
        match tank_type {
            TankType::Player => &self.player,
            TankType::Basic => &self.basic,
            TankType::Fast => &self.fast,
            TankType::Power => &self.power,
            TankType::Armor => &self.armor,
        }
    }
}

impl Default for TankRoster {
    fn default() -> Self {
        Self {
            player: TankParams::new(1, 0.125, 4, 0),
            basic: TankParams::new(1, 0.0625, 8, 100),
            fast: TankParams::new(1, 0.1875, 8, 200),
            power: TankParams::new(1, 0.125, 4, 300),
            armor: TankParams::new(4, 0.0625, 8, 400),
        }
    }
}

/// Bullet parameters shared by every tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletParams {
    /// Edge length in tiles.
    pub size: f32,
    /// Tiles per movement step.
    pub speed: f32,
}

impl Default for BulletParams {
    fn default() -> Self {
        Self {
            size: 0.25,
            speed: 0.5,
        }
    }
}

/// Default level dimensions and generator seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Grid width in tiles.
    pub size_x: u32,
    /// Grid height in tiles.
    pub size_y: u32,
    /// Seed mixed into procedural level generation.
    pub seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            size_x: 26,
            size_y: 26,
            seed: 0,
        }
    }
}

/// Top-level arena configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Edge length of every tank in tiles.
    pub tank_size: f32,
    /// Per-archetype tank parameters.
    pub tanks: TankRoster,
    /// Bullet parameters.
    pub bullet: BulletParams,
    /// Level dimensions.
    pub level: LevelConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            tank_size: 1.0,
            tanks: TankRoster::default(),
            bullet: BulletParams::default(),
            level: LevelConfig::default(),
        }
    }
}

impl ArenaConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that sizes and speeds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tank_size", self.tank_size)?;
        positive("bullet.size", self.bullet.size)?;
        positive("bullet.speed", self.bullet.speed)?;
        if self.level.size_x == 0 || self.level.size_y == 0 {
            return Err(ConfigError::Invalid {
                field: "level".to_string(),
                reason: "grid dimensions must be non-zero",
            });
        }
        for tank_type in TankType::ALL {
            let params = self.tanks.get(tank_type);
            let field = format!("tanks.{}", tank_type.to_string().to_lowercase());
            if params.health == 0 {
                return Err(ConfigError::Invalid {
                    field: format!("{field}.health"),
                    reason: "must be at least 1",
                });
            }
            if !params.speed.is_finite() || params.speed < 0.0 {
                return Err(ConfigError::Invalid {
                    field: format!("{field}.speed"),
                    reason: "must be finite and non-negative",
                });
            }
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: "must be finite and positive",
        })
    }
}
