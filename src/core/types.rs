//! Core data types for the map screen

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Geodetic coordinate in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A single device position reported by the location service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// Milliseconds since epoch as reported by the platform
    pub timestamp_ms: u64,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, timestamp_ms: u64) -> Self {
        Self { coordinate, timestamp_ms }
    }
}

/// Where the camera should end up once both animation phases have run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub center: Coordinate,
    /// Eye distance from the center point (meters)
    pub distance: f64,
    /// Tilt from straight down (degrees)
    pub pitch: f64,
    pub heading_approach: f64,
    pub heading_settle: f64,
}

impl CameraTarget {
    /// Pose the camera takes at the end of the approach phase
    pub fn approach_pose(&self) -> CameraPose {
        CameraPose {
            center: self.center,
            distance: self.distance,
            pitch: self.pitch,
            heading: self.heading_approach,
        }
    }

    /// Pose the camera takes at the end of the settle phase
    pub fn settle_pose(&self) -> CameraPose {
        CameraPose {
            center: self.center,
            distance: self.distance,
            pitch: self.pitch,
            heading: self.heading_settle,
        }
    }
}

/// Camera pose handed to the renderer for a single animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub center: Coordinate,
    pub distance: f64,
    pub pitch: f64,
    /// Compass heading (degrees, 0 = north up)
    pub heading: f64,
}

/// Reverse geocoding result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Placemark {
    pub name: Option<String>,
    pub locality: Option<String>,
    pub country: Option<String>,
    /// Position the geocoder resolved the place to; may differ slightly from the fix
    pub coordinate: Option<Coordinate>,
}

impl Placemark {
    /// Best human readable label for the place
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.name.as_deref(),
            self.locality.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Overlay outline as a ring of vertices (x = longitude, y = latitude).
/// The ring is implicitly closed: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        Self { vertices }
    }

    pub fn from_coordinates(coordinates: &[Coordinate]) -> Self {
        Self {
            vertices: coordinates
                .iter()
                .map(|c| Point2::new(c.longitude, c.latitude))
                .collect(),
        }
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.vertices
            .iter()
            .map(|p| Coordinate::new(p.y, p.x))
            .collect()
    }

    /// Vertex average; equals the cell center for rectangular overlays
    pub fn centroid(&self) -> Option<Coordinate> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector2::<f64>::zeros(), |acc, p| acc + p.coords);
        let mean = sum / self.vertices.len() as f64;
        Some(Coordinate::new(mean.y, mean.x))
    }
}
