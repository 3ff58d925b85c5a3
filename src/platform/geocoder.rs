//! Reverse geocoding capability

use crate::core::Coordinate;
use serde::{Deserialize, Serialize};

/// Ticket for one reverse-geocode lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodeRequest {
    /// Monotonic id, used to drop results for fixes that have since been replaced
    pub id: u64,
    pub coordinate: Coordinate,
}

/// Best-effort place lookup. Results are delivered back through
/// `MapScreen::on_geocode_resolved` carrying the same request.
pub trait ReverseGeocoder {
    fn lookup(&mut self, request: GeocodeRequest);
}
