//! Location and geocoding error types

use thiserror::Error;

/// Failures reported by, or derived from, the platform capabilities
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// User declined location access
    #[error("location permission denied")]
    PermissionDenied,
    /// Access blocked by device policy
    #[error("location permission restricted")]
    PermissionRestricted,
    /// Location service could not produce a fix
    #[error("position fix unavailable: {reason}")]
    FixUnavailable { reason: String },
    /// Reverse geocoding failed or returned nothing usable
    #[error("reverse geocode unavailable: {reason}")]
    GeocodeUnavailable { reason: String },
}

impl LocationError {
    pub fn fix_unavailable(reason: impl Into<String>) -> Self {
        LocationError::FixUnavailable { reason: reason.into() }
    }

    pub fn geocode_unavailable(reason: impl Into<String>) -> Self {
        LocationError::GeocodeUnavailable { reason: reason.into() }
    }
}

/// Result type for capability callbacks
pub type LocationResult<T> = Result<T, LocationError>;
