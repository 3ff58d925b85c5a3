//! Recording capability implementations for testing and demos

use crate::core::{CameraPose, Coordinate, Placemark, Polygon};
use crate::platform::{
    AuthorizationState, CameraAnimation, GeocodeRequest, LocationService, MapRenderer,
    ReverseGeocoder,
};

/// Call made against the mock location service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationCall {
    RequestPermission,
    RequestSingleFix,
}

/// Mock location service that records every request
pub struct MockLocationService {
    status: AuthorizationState,
    calls: Vec<LocationCall>,
}

impl MockLocationService {
    /// Create a mock reporting `status` as the current authorization
    pub fn new(status: AuthorizationState) -> Self {
        Self {
            status,
            calls: Vec::new(),
        }
    }

    /// Simulate the user changing the permission in system settings
    pub fn set_status(&mut self, status: AuthorizationState) {
        self.status = status;
    }

    pub fn calls(&self) -> &[LocationCall] {
        &self.calls
    }

    pub fn permission_requests(&self) -> usize {
        self.count(LocationCall::RequestPermission)
    }

    pub fn fix_requests(&self) -> usize {
        self.count(LocationCall::RequestSingleFix)
    }

    fn count(&self, call: LocationCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }
}

impl LocationService for MockLocationService {
    fn authorization_status(&self) -> AuthorizationState {
        self.status
    }

    fn request_permission(&mut self) {
        self.calls.push(LocationCall::RequestPermission);
    }

    fn request_single_fix(&mut self) {
        self.calls.push(LocationCall::RequestSingleFix);
    }
}

/// Draw call made against the recording renderer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    SetOverlay(Polygon),
    ClearOverlay,
    SetCamera(CameraPose, CameraAnimation),
}

/// Renderer that keeps the current overlay and a log of every call
#[derive(Default)]
pub struct RecordingRenderer {
    overlay: Option<Polygon>,
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<&Polygon> {
        self.overlay.as_ref()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Camera commands in the order they were issued
    pub fn camera_calls(&self) -> Vec<(CameraPose, CameraAnimation)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::SetCamera(pose, animation) => Some((*pose, *animation)),
                _ => None,
            })
            .collect()
    }

    pub fn last_camera(&self) -> Option<(CameraPose, CameraAnimation)> {
        self.camera_calls().last().copied()
    }
}

impl MapRenderer for RecordingRenderer {
    fn set_overlay(&mut self, polygon: Polygon) {
        self.overlay = Some(polygon.clone());
        self.calls.push(RenderCall::SetOverlay(polygon));
    }

    fn clear_overlay(&mut self) {
        self.overlay = None;
        self.calls.push(RenderCall::ClearOverlay);
    }

    fn set_camera(&mut self, pose: CameraPose, animation: CameraAnimation) {
        self.calls.push(RenderCall::SetCamera(pose, animation));
    }
}

/// Geocoder that queues lookups until the test or demo answers them
#[derive(Default)]
pub struct MockGeocoder {
    pending: Vec<GeocodeRequest>,
    lookups: usize,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the oldest unanswered lookup
    pub fn take_next(&mut self) -> Option<GeocodeRequest> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    pub fn pending(&self) -> &[GeocodeRequest] {
        &self.pending
    }

    /// Total lookups ever requested
    pub fn lookup_count(&self) -> usize {
        self.lookups
    }

    /// Placemark sitting `offset` degrees north-east of the request
    pub fn placemark_for(request: &GeocodeRequest, name: &str, offset: f64) -> Placemark {
        Placemark {
            name: Some(name.to_string()),
            locality: None,
            country: None,
            coordinate: Some(Coordinate::new(
                request.coordinate.latitude + offset,
                request.coordinate.longitude + offset,
            )),
        }
    }
}

impl ReverseGeocoder for MockGeocoder {
    fn lookup(&mut self, request: GeocodeRequest) {
        self.lookups += 1;
        self.pending.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{AnimationId, Easing};
    use std::time::Duration;

    #[test]
    fn test_mock_location_records_calls() {
        let mut location = MockLocationService::new(AuthorizationState::NotDetermined);
        location.request_permission();
        location.request_single_fix();
        location.request_single_fix();

        assert_eq!(location.permission_requests(), 1);
        assert_eq!(location.fix_requests(), 2);
        assert_eq!(location.calls()[0], LocationCall::RequestPermission);

        location.set_status(AuthorizationState::Denied);
        assert_eq!(location.authorization_status(), AuthorizationState::Denied);
    }

    #[test]
    fn test_recording_renderer_replaces_overlay() {
        let mut renderer = RecordingRenderer::new();
        let first = Polygon::from_coordinates(&[Coordinate::new(0.0, 0.0)]);
        let second = Polygon::from_coordinates(&[Coordinate::new(1.0, 1.0)]);

        renderer.set_overlay(first);
        renderer.set_overlay(second.clone());
        assert_eq!(renderer.overlay(), Some(&second));

        renderer.clear_overlay();
        assert!(renderer.overlay().is_none());
        assert_eq!(renderer.calls().len(), 3);
    }

    #[test]
    fn test_recording_renderer_camera_log() {
        let mut renderer = RecordingRenderer::new();
        let pose = CameraPose {
            center: Coordinate::new(1.0, 2.0),
            distance: 3000.0,
            pitch: 60.0,
            heading: 120.0,
        };
        let animation = CameraAnimation {
            id: AnimationId::new(7),
            duration: Duration::from_millis(1800),
            easing: Easing::EaseIn,
            allow_user_interaction: true,
        };

        renderer.set_camera(pose, animation);
        assert_eq!(renderer.last_camera(), Some((pose, animation)));
        assert_eq!(renderer.camera_calls().len(), 1);
    }

    #[test]
    fn test_mock_geocoder_queue() {
        let mut geocoder = MockGeocoder::new();
        let request = GeocodeRequest {
            id: 1,
            coordinate: Coordinate::new(10.0, 10.0),
        };
        geocoder.lookup(request);

        assert_eq!(geocoder.pending().len(), 1);
        assert_eq!(geocoder.take_next(), Some(request));
        assert_eq!(geocoder.take_next(), None);
        assert_eq!(geocoder.lookup_count(), 1);

        let placemark = MockGeocoder::placemark_for(&request, "Somewhere", 0.5);
        assert_eq!(placemark.coordinate, Some(Coordinate::new(10.5, 10.5)));
    }
}
