//! Position update pipeline
//!
//! Turns a raw fix into the grid overlay, a camera target and a reverse-geocode
//! request. Owns the current overlay and camera target; nothing else writes
//! them.

use crate::algorithms::grid_codec::{self, GridArea, GridCode};
use crate::algorithms::CodecResult;
use crate::core::{CameraTarget, Coordinate, Placemark, Polygon, PositionFix};
use crate::platform::{GeocodeRequest, LocationError, LocationResult};
use crate::utils::{CameraConfig, ScreenConfig};
use tracing::{debug, error, info, warn};

/// Everything derived from one fix
#[derive(Debug, Clone, PartialEq)]
pub struct FixUpdate {
    pub fix: PositionFix,
    pub code: GridCode,
    pub area: GridArea,
    pub overlay: Polygon,
    pub camera_target: CameraTarget,
    pub geocode_request: GeocodeRequest,
}

pub struct PositionUpdatePipeline {
    code_length: usize,
    camera: CameraConfig,
    current_overlay: Option<Polygon>,
    current_target: Option<CameraTarget>,
    current_code: Option<GridCode>,
    current_area: Option<GridArea>,
    place_name: Option<String>,
    awaiting_geocode: Option<u64>,
    next_geocode_id: u64,
}

impl PositionUpdatePipeline {
    pub fn new(config: &ScreenConfig) -> Self {
        Self {
            code_length: config.code_length,
            camera: config.camera,
            current_overlay: None,
            current_target: None,
            current_code: None,
            current_area: None,
            place_name: None,
            awaiting_geocode: None,
            next_geocode_id: 1,
        }
    }

    /// Camera target for `center` using the configured viewing parameters
    pub fn camera_target_for(&self, center: Coordinate) -> CameraTarget {
        CameraTarget {
            center,
            distance: self.camera.distance_m,
            pitch: self.camera.pitch_deg,
            heading_approach: self.camera.approach_heading_deg,
            heading_settle: self.camera.settle_heading_deg,
        }
    }

    /// Derive overlay, camera target and geocode request from a fix.
    ///
    /// Codec failures mean the fix broke the coordinate contract. Debug builds
    /// panic; release builds log and reject the fix.
    pub fn on_fix_received(&mut self, fix: PositionFix) -> CodecResult<FixUpdate> {
        let derived = grid_codec::encode(fix.coordinate, self.code_length)
            .and_then(|code| grid_codec::decode(code.as_str()).map(|area| (code, area)));

        let (code, area) = match derived {
            Ok(derived) => derived,
            Err(e) => {
                error!(
                    lat = fix.coordinate.latitude,
                    lon = fix.coordinate.longitude,
                    error = %e,
                    "grid encoding rejected fix"
                );
                if cfg!(debug_assertions) {
                    panic!("grid encoding contract violated: {}", e);
                }
                return Err(e);
            }
        };

        let overlay = area.to_polygon();
        let camera_target = self.camera_target_for(fix.coordinate);
        let geocode_request = GeocodeRequest {
            id: self.next_geocode_id,
            coordinate: fix.coordinate,
        };
        self.next_geocode_id += 1;

        info!(
            code = %code,
            lat = fix.coordinate.latitude,
            lon = fix.coordinate.longitude,
            timestamp_ms = fix.timestamp_ms,
            "position fix received"
        );

        self.current_overlay = Some(overlay.clone());
        self.current_target = Some(camera_target);
        self.current_code = Some(code.clone());
        self.current_area = Some(area);
        self.place_name = None;
        self.awaiting_geocode = Some(geocode_request.id);

        Ok(FixUpdate {
            fix,
            code,
            area,
            overlay,
            camera_target,
            geocode_request,
        })
    }

    /// Consume the first fix of a batch; the rest are ignored
    pub fn on_fixes_received(&mut self, fixes: &[PositionFix]) -> Option<CodecResult<FixUpdate>> {
        match fixes.first() {
            Some(fix) => {
                if fixes.len() > 1 {
                    debug!(dropped = fixes.len() - 1, "using first fix of batch");
                }
                Some(self.on_fix_received(*fix))
            }
            None => {
                debug!("empty fix batch");
                None
            }
        }
    }

    /// Fold in a reverse-geocode result. Returns the camera target to move to
    /// when the result carries a usable coordinate for the current fix.
    pub fn on_geocode_resolved(
        &mut self,
        request: GeocodeRequest,
        result: LocationResult<Placemark>,
    ) -> Option<CameraTarget> {
        if self.awaiting_geocode != Some(request.id) {
            debug!(request = request.id, "dropping geocode result for replaced fix");
            return None;
        }
        self.awaiting_geocode = None;

        let placemark = match result {
            Ok(placemark) => placemark,
            Err(e) => {
                debug!(request = request.id, error = %e, "reverse geocode failed");
                return None;
            }
        };

        self.place_name = placemark.display_name();
        if let Some(name) = &self.place_name {
            info!(place = %name, "place resolved");
        }

        let coordinate = match placemark.coordinate {
            Some(c) if c.is_valid() => c,
            _ => {
                debug!(
                    request = request.id,
                    error = %LocationError::geocode_unavailable("placemark has no usable coordinate"),
                    "keeping raw fix camera"
                );
                return None;
            }
        };

        let target = self.camera_target_for(coordinate);
        self.current_target = Some(target);
        Some(target)
    }

    /// Forget the current position. Pending geocode results are dropped.
    pub fn clear(&mut self) {
        self.current_overlay = None;
        self.current_target = None;
        self.current_code = None;
        self.current_area = None;
        self.place_name = None;
        self.awaiting_geocode = None;
    }

    /// Log a failed fix request. Not retried; no state changes.
    pub fn on_fix_failed(&self, error: &LocationError) {
        warn!(error = %error, "position fix failed");
    }

    pub fn current_overlay(&self) -> Option<&Polygon> {
        self.current_overlay.as_ref()
    }

    pub fn current_target(&self) -> Option<&CameraTarget> {
        self.current_target.as_ref()
    }

    pub fn current_code(&self) -> Option<&GridCode> {
        self.current_code.as_ref()
    }

    pub fn current_area(&self) -> Option<&GridArea> {
        self.current_area.as_ref()
    }

    pub fn place_name(&self) -> Option<&str> {
        self.place_name.as_deref()
    }
}
