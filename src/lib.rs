//! Map Position Screen
//!
//! Location authorization, grid-code overlay and two-phase camera sequencing
//! for a map screen that follows the device position.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod platform;
pub mod api;

// Re-export commonly used types
pub use crate::core::{CameraPose, CameraTarget, Coordinate, Placemark, Polygon, PositionFix};
pub use algorithms::{decode, encode, CodecError, CodecResult, GridArea, GridCode};
pub use processing::{AuthorizationMachine, CameraPhase, CameraSequencer, PositionUpdatePipeline};
pub use platform::{
    AnimationId, AuthorizationState, CameraAnimation, Easing, GeocodeRequest, LocationError,
    LocationService, MapRenderer, ReverseGeocoder,
};
pub use utils::{ConfigError, ConfigurationManager, GeocodeCameraPolicy, ScreenConfig};
pub use api::{MapScreen, ScreenEvent, ScreenSnapshot};
