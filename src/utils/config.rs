use crate::core::{
    APPROACH_DURATION_MS, APPROACH_HEADING_DEG, CAMERA_DISTANCE_M, CAMERA_PITCH_DEG,
    DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, SETTLE_DURATION_MS, SETTLE_HEADING_DEG,
};
use crate::platform::Easing;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// What a late reverse-geocode result does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeCameraPolicy {
    /// Run a full approach + settle toward the geocoded coordinate
    #[default]
    Resequence,
    /// Single settle-pose move toward the geocoded coordinate
    SettleOnly,
    /// Record the place name, leave the camera alone
    Ignore,
}

/// Timing of one camera animation phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub duration_ms: u64,
    pub easing: Easing,
    pub allow_user_interaction: bool,
}

impl PhaseConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Viewing parameters for the two-phase camera move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Eye distance from the target (meters)
    pub distance_m: f64,
    /// Tilt from straight down (degrees)
    pub pitch_deg: f64,
    pub approach_heading_deg: f64,
    pub settle_heading_deg: f64,
    pub approach: PhaseConfig,
    pub settle: PhaseConfig,
}

/// Screen-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Significant digits of the overlay grid code
    pub code_length: usize,
    pub camera: CameraConfig,
    pub geocode_camera_policy: GeocodeCameraPolicy,
    /// Also request a fix when authorization changes to "always"
    pub fix_on_always_authorization: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance_m: CAMERA_DISTANCE_M,
            pitch_deg: CAMERA_PITCH_DEG,
            approach_heading_deg: APPROACH_HEADING_DEG,
            settle_heading_deg: SETTLE_HEADING_DEG,
            approach: PhaseConfig {
                duration_ms: APPROACH_DURATION_MS,
                easing: Easing::EaseIn,
                allow_user_interaction: true,
            },
            settle: PhaseConfig {
                duration_ms: SETTLE_DURATION_MS,
                easing: Easing::EaseOut,
                allow_user_interaction: true,
            },
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            camera: CameraConfig::default(),
            geocode_camera_policy: GeocodeCameraPolicy::default(),
            fix_on_always_authorization: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("config i/o error: {message}")]
    IoError { message: String },
    #[error("config serialization error: {message}")]
    SerializationError { message: String },
}

fn invalid(parameter: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl ScreenConfig {
    /// Check every parameter, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_length < 2 || self.code_length > MAX_CODE_LENGTH || self.code_length % 2 != 0 {
            return Err(invalid(
                "code_length",
                self.code_length,
                "must be an even number between 2 and 10",
            ));
        }

        let camera = &self.camera;
        if !camera.distance_m.is_finite() || camera.distance_m <= 0.0 {
            return Err(invalid("camera.distance_m", camera.distance_m, "must be positive"));
        }
        if !(0.0..90.0).contains(&camera.pitch_deg) {
            return Err(invalid("camera.pitch_deg", camera.pitch_deg, "must be in [0, 90)"));
        }
        if !camera.approach_heading_deg.is_finite() {
            return Err(invalid(
                "camera.approach_heading_deg",
                camera.approach_heading_deg,
                "must be finite",
            ));
        }
        if !camera.settle_heading_deg.is_finite() {
            return Err(invalid(
                "camera.settle_heading_deg",
                camera.settle_heading_deg,
                "must be finite",
            ));
        }
        if camera.approach.duration_ms == 0 {
            return Err(invalid("camera.approach.duration_ms", 0, "must be non-zero"));
        }
        if camera.settle.duration_ms == 0 {
            return Err(invalid("camera.settle.duration_ms", 0, "must be non-zero"));
        }

        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ScreenConfig = serde_json::from_str(json).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("Failed to parse config: {}", e),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}

/// Owns the active configuration and its backing file
pub struct ConfigurationManager {
    config: ScreenConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: ScreenConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: ScreenConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        self.config = ScreenConfig::from_json(&content)?;
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to `path`, or to the file it was loaded from
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: Option<P>) -> Result<(), ConfigError> {
        let target = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => self.config_file_path.clone().ok_or_else(|| ConfigError::IoError {
                message: "No config file path set".to_string(),
            })?,
        };

        let json = self.config.to_json()?;
        fs::write(&target, json).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", target.display(), e),
        })?;

        self.config_file_path = Some(target);
        self.is_modified = false;
        Ok(())
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}
