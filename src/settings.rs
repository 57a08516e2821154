//! Game settings and tuning
//!
//! Persisted separately from progression (which stays in memory for the session).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Physics, input and feedback coefficients for the player ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Horizontal force per unit of input
    pub speed: f32,
    /// Upward impulse applied on jump
    pub jump_force: f32,
    /// Ball mass (kg)
    pub mass: f32,
    /// Ball radius (m)
    pub ball_radius: f32,
    /// Vertical gravity acceleration (negative is down)
    pub gravity: f32,
    /// Velocity damping per second (0 = none)
    pub linear_damping: f32,
    /// Fraction of normal speed kept when bouncing off a wall
    pub restitution: f32,

    // === Tilt input ===
    /// Normalized tilt components below this are ignored
    pub tilt_deadzone: f32,
    /// Multiplier applied to tilt after the deadzone
    pub tilt_sensitivity: f32,

    // === Level flow ===
    /// Falling below this height restarts the level
    pub fall_threshold: f32,
    /// Seconds between reaching the end zone and the victory page
    /// (0 = wait for the completion cue, immediate when it is silent)
    pub victory_delay: f32,
    /// Page index to open on the reloaded scene after a fall
    pub fell_page: Option<usize>,

    // === Rolling audio ===
    pub rolling_min_speed: f32,
    pub rolling_volume_scale: f32,
    pub rolling_max_volume: f32,
    pub rolling_base_pitch: f32,
    pub rolling_pitch_scale: f32,

    // === Impact audio ===
    pub impact_min_speed: f32,
    pub impact_volume_scale: f32,
    pub impact_max_volume: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            jump_force: 2.0,
            mass: 1.0,
            ball_radius: 0.5,
            gravity: -9.81,
            linear_damping: 0.0,
            restitution: 0.3,

            tilt_deadzone: 0.1,
            tilt_sensitivity: 1.0,

            fall_threshold: -10.0,
            victory_delay: 0.0,
            fell_page: None,

            rolling_min_speed: 0.1,
            rolling_volume_scale: 0.1,
            rolling_max_volume: 1.0,
            rolling_base_pitch: 0.8,
            rolling_pitch_scale: 0.05,

            impact_min_speed: 2.0,
            impact_volume_scale: 0.1,
            impact_max_volume: 1.0,
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed < 0.0 {
            return Err(ConfigError::Invalid(format!("speed must be >= 0, got {}", self.speed)));
        }
        if self.mass <= 0.0 {
            return Err(ConfigError::Invalid(format!("mass must be > 0, got {}", self.mass)));
        }
        if self.ball_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ball_radius must be > 0, got {}",
                self.ball_radius
            )));
        }
        if !(0.0..1.0).contains(&self.tilt_deadzone) {
            return Err(ConfigError::Invalid(format!(
                "tilt_deadzone must be in [0, 1), got {}",
                self.tilt_deadzone
            )));
        }
        if self.victory_delay < 0.0 || self.rolling_min_speed < 0.0 || self.impact_min_speed < 0.0 {
            return Err(ConfigError::Invalid("delays and thresholds must be >= 0".into()));
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Input ===
    /// Use device tilt instead of direction keys
    pub tilt_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            tilt_controls: false,
        }
    }
}

impl Settings {
    /// Effective cue volume multiplier
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "roll_a_ball_settings";

    /// Default settings file name next to the executable's working directory
    pub const FILE_NAME: &'static str = "roll_a_ball.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from [`Self::FILE_NAME`], falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match Self::load_from(Self::FILE_NAME) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Self::FILE_NAME);
                settings
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e}", Self::FILE_NAME);
                Self::default()
            }
        }
    }

    /// Write settings to [`Self::FILE_NAME`]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::FILE_NAME, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "tuning": { "speed": 4.0 }, "muted": true }"#)
            .expect("valid settings");
        assert_eq!(settings.tuning.speed, 4.0);
        assert_eq!(settings.tuning.jump_force, Tuning::default().jump_force);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let err = Settings::from_json(r#"{ "tuning": { "mass": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_effective_volume() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effective_volume() - 0.25).abs() < 1e-6);
    }
}
