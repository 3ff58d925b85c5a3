//! Utility modules for configuration

pub mod config;

pub use config::{
    CameraConfig, ConfigError, ConfigurationManager, GeocodeCameraPolicy, PhaseConfig,
    ScreenConfig,
};
