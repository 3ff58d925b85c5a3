//! Map screen controller
//!
//! Wires the platform capabilities to the authorization machine, the position
//! pipeline and the camera sequencer. The host forwards every platform
//! notification to the matching `on_*` handler; all handlers run on the same
//! thread as the map surface.

use crate::algorithms::{CodecError, GridCode};
use crate::api::formatting::ScreenSnapshot;
use crate::core::{Placemark, PositionFix};
use crate::platform::{
    AnimationId, AuthorizationState, GeocodeRequest, LocationError, LocationResult,
    LocationService, MapRenderer, ReverseGeocoder,
};
use crate::processing::{
    AuthorizationEffect, AuthorizationEvent, AuthorizationMachine, AuthorizationPolicy,
    CameraPhase, CameraSequencer, PositionUpdatePipeline,
};
use crate::utils::{ConfigError, GeocodeCameraPolicy, ScreenConfig};
use std::collections::HashMap;
use tracing::{debug, info};

/// Screen events delivered to registered observers
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    AuthorizationChanged {
        old_state: AuthorizationState,
        new_state: AuthorizationState,
    },
    /// The grid overlay now shows the cell for `code`
    OverlayReplaced { code: GridCode },
    /// Location access was withdrawn and the overlay removed
    OverlayCleared,
    CameraPhaseChanged { phase: CameraPhase },
    PlaceResolved { name: String },
    FixFailed { error: LocationError },
    /// Fix broke the coordinate contract and was dropped (release builds)
    FixRejected { error: CodecError },
}

/// Callback function type for screen events
pub type EventCallback = Box<dyn Fn(ScreenEvent) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

pub struct MapScreen<L, R, G>
where
    L: LocationService,
    R: MapRenderer,
    G: ReverseGeocoder,
{
    location: L,
    renderer: R,
    geocoder: G,
    config: ScreenConfig,
    authorization: AuthorizationMachine,
    pipeline: PositionUpdatePipeline,
    camera: CameraSequencer,
    callback_counter: u32,
    event_callbacks: HashMap<CallbackHandle, EventCallback>,
}

impl<L, R, G> MapScreen<L, R, G>
where
    L: LocationService,
    R: MapRenderer,
    G: ReverseGeocoder,
{
    /// Create a screen over the given capabilities
    pub fn new(location: L, renderer: R, geocoder: G, config: ScreenConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let policy = AuthorizationPolicy {
            fix_on_always: config.fix_on_always_authorization,
        };

        Ok(Self {
            location,
            renderer,
            geocoder,
            authorization: AuthorizationMachine::new(policy),
            pipeline: PositionUpdatePipeline::new(&config),
            camera: CameraSequencer::new(config.camera),
            config,
            callback_counter: 0,
            event_callbacks: HashMap::new(),
        })
    }

    /// Screen came up: read the current authorization and act on it
    pub fn initialize(&mut self) {
        let current = self.location.authorization_status();
        info!(?current, "initializing location");
        self.handle_authorization(AuthorizationEvent::Initialize { current });
    }

    /// Platform reported an authorization change
    pub fn on_authorization_changed(&mut self, state: AuthorizationState) {
        self.handle_authorization(AuthorizationEvent::Changed(state));
    }

    /// Platform delivered position fixes; only the first is used
    pub fn on_fixes_received(&mut self, fixes: &[PositionFix]) {
        let update = match self.pipeline.on_fixes_received(fixes) {
            Some(Ok(update)) => update,
            Some(Err(error)) => {
                self.trigger_event(ScreenEvent::FixRejected { error });
                return;
            }
            None => return,
        };

        // Overlay and approach go out before the geocode round trip starts
        self.renderer.set_overlay(update.overlay.clone());
        self.trigger_event(ScreenEvent::OverlayReplaced {
            code: update.code.clone(),
        });

        self.camera.start(update.camera_target, &mut self.renderer);
        self.trigger_event(ScreenEvent::CameraPhaseChanged {
            phase: self.camera.phase(),
        });

        self.geocoder.lookup(update.geocode_request);
    }

    /// Platform could not produce a fix
    pub fn on_fix_failed(&mut self, error: LocationError) {
        self.pipeline.on_fix_failed(&error);
        self.trigger_event(ScreenEvent::FixFailed { error });
    }

    /// Reverse geocoder answered `request`
    pub fn on_geocode_resolved(&mut self, request: GeocodeRequest, result: LocationResult<Placemark>) {
        let previous_place = self.pipeline.place_name().map(str::to_string);
        let target = self.pipeline.on_geocode_resolved(request, result);

        if let Some(name) = self.pipeline.place_name() {
            if previous_place.as_deref() != Some(name) {
                let name = name.to_string();
                self.trigger_event(ScreenEvent::PlaceResolved { name });
            }
        }

        let Some(target) = target else {
            return;
        };

        match self.config.geocode_camera_policy {
            GeocodeCameraPolicy::Resequence => {
                self.camera.start(target, &mut self.renderer);
            }
            GeocodeCameraPolicy::SettleOnly => {
                self.camera.settle_only(target, &mut self.renderer);
            }
            GeocodeCameraPolicy::Ignore => {
                debug!("geocoded coordinate ignored by policy");
                return;
            }
        }
        self.trigger_event(ScreenEvent::CameraPhaseChanged {
            phase: self.camera.phase(),
        });
    }

    /// Renderer finished camera animation `id`
    pub fn on_camera_animation_finished(&mut self, id: AnimationId) {
        let before = self.camera.phase();
        if self.camera.on_animation_finished(id, &mut self.renderer) {
            let phase = self.camera.phase();
            if phase != before {
                self.trigger_event(ScreenEvent::CameraPhaseChanged { phase });
            }
        }
    }

    fn handle_authorization(&mut self, event: AuthorizationEvent) {
        let old_state = self.authorization.state();
        let effects = self.authorization.handle(event);
        let new_state = self.authorization.state();

        if old_state != new_state {
            self.trigger_event(ScreenEvent::AuthorizationChanged { old_state, new_state });

            if new_state.is_refused() && self.pipeline.current_overlay().is_some() {
                info!(?new_state, "location access withdrawn; clearing overlay");
                self.pipeline.clear();
                self.camera.cancel();
                self.renderer.clear_overlay();
                self.trigger_event(ScreenEvent::OverlayCleared);
                self.trigger_event(ScreenEvent::CameraPhaseChanged {
                    phase: self.camera.phase(),
                });
            }
        }

        for effect in effects {
            match effect {
                AuthorizationEffect::RequestPermission => {
                    info!("requesting location permission");
                    self.location.request_permission();
                }
                AuthorizationEffect::RequestSingleFix => {
                    info!("requesting position fix");
                    self.location.request_single_fix();
                }
            }
        }
    }

    /// Register an event callback
    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.event_callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a callback; returns false for an unknown handle
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.event_callbacks.remove(&handle).is_some()
    }

    fn trigger_event(&self, event: ScreenEvent) {
        for callback in self.event_callbacks.values() {
            callback(event.clone());
        }
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            authorization: self.authorization.state(),
            code: self.pipeline.current_code().cloned(),
            area: self.pipeline.current_area().copied(),
            place_name: self.pipeline.place_name().map(str::to_string),
            camera_phase: self.camera.phase(),
            camera_target: self.camera.current_target().copied(),
        }
    }

    pub fn authorization_state(&self) -> AuthorizationState {
        self.authorization.state()
    }

    pub fn camera_phase(&self) -> CameraPhase {
        self.camera.phase()
    }

    /// Animation the camera sequencer is waiting on
    pub fn pending_animation(&self) -> Option<AnimationId> {
        self.camera.pending_animation()
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn geocoder_mut(&mut self) -> &mut G {
        &mut self.geocoder
    }
}
