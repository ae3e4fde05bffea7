//! Simulation settings
//!
//! Loaded from an optional JSON file and validated once at setup. The tick
//! loop never sees an unvalidated value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    /// Platform must be finite and larger than a cube plus a wall
    InvalidPlatformSize(f32),
    /// A speed is negative, non-finite, or zero where motion is required
    InvalidSpeed { name: &'static str, value: f32 },
    /// Cooldown is negative or non-finite
    InvalidCooldown(f32),
    /// Standard I/O error
    IoError(std::io::Error),
    /// JSON serialization/deserialization error
    JsonError(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::InvalidPlatformSize(size) => {
                write!(f, "invalid platform size: {size}")
            }
            SettingsError::InvalidSpeed { name, value } => {
                write!(f, "invalid {name}: {value}")
            }
            SettingsError::InvalidCooldown(value) => write!(f, "invalid shoot cooldown: {value}"),
            SettingsError::IoError(e) => write!(f, "IO error: {e}"),
            SettingsError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::IoError(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::JsonError(e)
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for wall heights and enemy placement
    pub seed: u64,
    /// Level to build (only level 1 has a layout)
    pub level: u32,
    /// Platform edge length
    pub platform_size: f32,

    // === Movement ===
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub bullet_speed: f32,
    /// Degrees per tick
    pub turn_step: f32,
    /// Degrees per tick
    pub yaw_step: f32,

    // === Combat ===
    /// Seconds between shots
    pub shoot_cooldown: f32,
    /// Consult a bullet's collided walls before letting it bounce off the
    /// same wall again. Off keeps the classic behaviour.
    pub dedup_wall_bounces: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x00C0_FFEE,
            level: 1,
            platform_size: PLATFORM_SIZE,

            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            bullet_speed: BULLET_SPEED,
            turn_step: TURN_STEP,
            yaw_step: YAW_STEP,

            shoot_cooldown: SHOOT_COOLDOWN,
            dedup_wall_bounces: false,
        }
    }
}

impl Settings {
    /// Smallest platform that still fits a cube next to a wall
    pub const MIN_PLATFORM_SIZE: f32 = 2.0 * (CUBE_HALF_EXTENT + WALL_HALF_EXTENT);

    /// Half of the platform edge (border coordinate)
    #[inline]
    pub fn half_platform(&self) -> f32 {
        self.platform_size / 2.0
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.platform_size.is_finite() || self.platform_size <= Self::MIN_PLATFORM_SIZE {
            return Err(SettingsError::InvalidPlatformSize(self.platform_size));
        }

        let speeds = [
            ("player speed", self.player_speed),
            ("enemy speed", self.enemy_speed),
            ("bullet speed", self.bullet_speed),
            ("turn step", self.turn_step),
            ("yaw step", self.yaw_step),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidSpeed { name, value });
            }
        }
        if self.bullet_speed == 0.0 {
            return Err(SettingsError::InvalidSpeed {
                name: "bullet speed",
                value: self.bullet_speed,
            });
        }

        if !self.shoot_cooldown.is_finite() || self.shoot_cooldown < 0.0 {
            return Err(SettingsError::InvalidCooldown(self.shoot_cooldown));
        }

        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        assert_eq!(Settings::default().half_platform(), 60.0);
    }

    #[test]
    fn test_rejects_degenerate_platform() {
        for size in [0.0, -5.0, 2.0, f32::NAN, f32::INFINITY] {
            let settings = Settings {
                platform_size: size,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(SettingsError::InvalidPlatformSize(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_speeds_and_cooldown() {
        let settings = Settings {
            bullet_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidSpeed { name: "bullet speed", .. })
        ));

        let settings = Settings {
            player_speed: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidSpeed { name: "player speed", .. })
        ));

        let settings = Settings {
            shoot_cooldown: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidCooldown(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "platform_size": 80.0 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.platform_size, 80.0);
        assert_eq!(settings.bullet_speed, BULLET_SPEED);
        assert!(!settings.dedup_wall_bounces);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::JsonError(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "platform_size": 1.0 }"#),
            Err(SettingsError::InvalidPlatformSize(_))
        ));
    }

    #[test]
    fn test_save_then_load_file() {
        let path = std::env::temp_dir().join(format!(
            "cube_arena_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            seed: 42,
            dedup_wall_bounces: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("cube_arena_definitely_missing.json");
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::IoError(_))
        ));
    }
}
