//! Screen state output formatting
//!
//! Console and log renderings of what the screen currently shows: the grid
//! code, its cell, the resolved place and where the camera is headed.

use crate::algorithms::{GridArea, GridCode};
use crate::core::CameraTarget;
use crate::platform::AuthorizationState;
use crate::processing::CameraPhase;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub authorization: AuthorizationState,
    pub code: Option<GridCode>,
    pub area: Option<GridArea>,
    pub place_name: Option<String>,
    pub camera_phase: CameraPhase,
    pub camera_target: Option<CameraTarget>,
}

/// Human-readable text formatter
#[derive(Default)]
pub struct TextFormatter {
    /// Single line output
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_text(&self, snapshot: &ScreenSnapshot) -> String {
        let code = snapshot
            .code
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let place = snapshot.place_name.as_deref().unwrap_or("-");

        if self.compact {
            return format!(
                "{} | {} | {:?} | {:?}",
                code, place, snapshot.camera_phase, snapshot.authorization
            );
        }

        let mut output = String::new();
        output.push_str(&format!("Authorization: {:?}\n", snapshot.authorization));
        output.push_str(&format!("Grid code:     {}\n", code));
        if let Some(area) = &snapshot.area {
            output.push_str(&format!(
                "Cell:          {:.6}..{:.6} N, {:.6}..{:.6} E\n",
                area.lat_lo, area.lat_hi, area.lon_lo, area.lon_hi
            ));
        }
        output.push_str(&format!("Place:         {}\n", place));
        output.push_str(&format!("Camera:        {:?}", snapshot.camera_phase));
        if let Some(target) = &snapshot.camera_target {
            output.push_str(&format!(
                " -> {:.6}, {:.6} @ {:.0} m, pitch {:.0}°",
                target.center.latitude, target.center.longitude, target.distance, target.pitch
            ));
        }
        output.push('\n');
        output
    }
}

/// JSON formatter for structured output
#[derive(Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, snapshot: &ScreenSnapshot) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        }
    }
}

/// CSV formatter for fix logging
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "code,lat_lo,lat_hi,lon_lo,lon_hi,place,camera_phase".to_string()
    }

    pub fn format_csv(&self, snapshot: &ScreenSnapshot) -> String {
        let code = snapshot.code.as_ref().map(|c| c.to_string()).unwrap_or_default();
        let (lat_lo, lat_hi, lon_lo, lon_hi) = snapshot
            .area
            .map(|a| (a.lat_lo, a.lat_hi, a.lon_lo, a.lon_hi))
            .unwrap_or((0.0, 0.0, 0.0, 0.0));
        // Commas would split the field
        let place = snapshot.place_name.as_deref().unwrap_or("").replace(',', ";");

        format!(
            "{},{:.6},{:.6},{:.6},{:.6},{},{:?}",
            code, lat_lo, lat_hi, lon_lo, lon_hi, place, snapshot.camera_phase
        )
    }
}
