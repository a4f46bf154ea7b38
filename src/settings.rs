//! Simulation settings
//!
//! Loaded from a JSON file; every field falls back to its default when
//! missing.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::BASE_STEP_DURATION;

/// Errors from loading or validating settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Width or height is zero
    EmptyBox { width: u32, height: u32 },
    /// Radius is zero
    ZeroRadius,
    /// `2 * radius` does not fit strictly inside the smaller box side
    BallTooLarge { radius: u32, width: u32, height: u32 },
    /// Step duration of zero sub-steps
    ZeroStepDuration,
    /// Rest pause range is empty or starts at zero
    InvalidRestPause { min: u32, max: u32 },
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBox { width, height } => {
                write!(f, "box must have positive dimensions, got {width}x{height}")
            }
            Self::ZeroRadius => write!(f, "ball radius must be positive"),
            Self::BallTooLarge {
                radius,
                width,
                height,
            } => write!(
                f,
                "ball of radius {radius} does not fit in a {width}x{height} box"
            ),
            Self::ZeroStepDuration => write!(f, "step duration must be at least one sub-step"),
            Self::InvalidRestPause { min, max } => {
                write!(f, "invalid rest pause range {min}..={max}")
            }
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Everything needed to build and run a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    // === Geometry ===
    pub box_width: u32,
    pub box_height: u32,
    pub ball_radius: u32,

    // === Timing ===
    /// Sub-steps per tick
    pub step_duration: u32,
    /// Wall-clock length of one sub-step (microseconds)
    pub tick_unit_micros: u64,
    /// Shortest rest pause, in rest units
    pub rest_pause_min: u32,
    /// Longest rest pause, in rest units (inclusive)
    pub rest_pause_max: u32,
    /// Wall-clock length of one rest unit (milliseconds)
    pub rest_unit_millis: u64,

    // === Consumer ===
    /// Redraw cadence of the field while the ball moves
    pub repaint_delay_millis: u64,

    /// RNG seed; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Stop the demo binary after this long; `None` runs until killed
    pub run_duration_secs: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            box_width: 640,
            box_height: 480,
            ball_radius: 20,

            step_duration: BASE_STEP_DURATION,
            tick_unit_micros: 1_000,
            rest_pause_min: 1,
            rest_pause_max: 10,
            rest_unit_millis: 1_000,

            repaint_delay_millis: 25,

            seed: None,
            run_duration_secs: None,
        }
    }
}

impl SimulationSettings {
    /// Env var naming the settings file
    pub const CONFIG_ENV: &'static str = "BALL_BOX_CONFIG";
    /// Settings file used when the env var is unset
    pub const DEFAULT_PATH: &'static str = "config/ball_box.json";

    /// Settings for a box of the given size, everything else default
    pub fn with_box(width: u32, height: u32, ball_radius: u32) -> Self {
        Self {
            box_width: width,
            box_height: height,
            ball_radius,
            ..Self::default()
        }
    }

    /// Load settings from `$BALL_BOX_CONFIG` (or the default path).
    /// Falls back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var(Self::CONFIG_ENV).unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {path}");
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Io(e.to_string()))?;
        Self::from_json(&json)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Box geometry alone: non-empty, and room for the ball to move
    pub fn check_box(width: u32, height: u32, radius: u32) -> Result<(), SettingsError> {
        if width == 0 || height == 0 {
            return Err(SettingsError::EmptyBox { width, height });
        }
        if radius == 0 {
            return Err(SettingsError::ZeroRadius);
        }
        if u64::from(radius) * 2 >= u64::from(width.min(height)) {
            return Err(SettingsError::BallTooLarge {
                radius,
                width,
                height,
            });
        }
        Ok(())
    }

    /// Check the settings describe a runnable simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        Self::check_box(self.box_width, self.box_height, self.ball_radius)?;
        if self.step_duration == 0 {
            return Err(SettingsError::ZeroStepDuration);
        }
        if self.rest_pause_min == 0 || self.rest_pause_min > self.rest_pause_max {
            return Err(SettingsError::InvalidRestPause {
                min: self.rest_pause_min,
                max: self.rest_pause_max,
            });
        }
        Ok(())
    }

    /// Wall-clock time for `sub_steps` sub-steps
    pub fn tick_duration(&self, sub_steps: u32) -> Duration {
        Duration::from_micros(self.tick_unit_micros.saturating_mul(u64::from(sub_steps)))
    }

    /// Wall-clock time for a rest pause of `units` rest units
    pub fn rest_duration(&self, units: u32) -> Duration {
        Duration::from_millis(self.rest_unit_millis.saturating_mul(u64::from(units)))
    }

    pub fn repaint_delay(&self) -> Duration {
        Duration::from_millis(self.repaint_delay_millis)
    }
}
