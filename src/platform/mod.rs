//! Platform capability abstraction
//!
//! The screen never talks to the OS directly. Location services, the map
//! surface and reverse geocoding are reached through the traits here, so the
//! decision logic can be driven by recording mocks in tests.

pub mod location;
pub mod renderer;
pub mod geocoder;
pub mod mock;
pub mod error;

pub use location::{AuthorizationState, LocationService};
pub use renderer::{AnimationId, CameraAnimation, Easing, MapRenderer};
pub use geocoder::{GeocodeRequest, ReverseGeocoder};
pub use mock::{LocationCall, MockGeocoder, MockLocationService, RecordingRenderer, RenderCall};
pub use error::{LocationError, LocationResult};
