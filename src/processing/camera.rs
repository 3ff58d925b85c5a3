//! Two-phase camera sequencing
//!
//! Each target is reached in two animations: an approach that flies in on an
//! angled heading, then a settle that levels the heading once the approach
//! reports completion. Every command carries a fresh [`AnimationId`]; a
//! completion only advances the sequence if it carries the id the sequencer is
//! currently waiting for. Starting a new target drops the pending settle of the
//! old one, so a superseded sequence can never move the camera again.

use crate::core::CameraTarget;
use crate::platform::{AnimationId, CameraAnimation, MapRenderer};
use crate::utils::{CameraConfig, PhaseConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Externally visible sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraPhase {
    Idle,
    Approaching,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SequenceState {
    Idle,
    Approaching { id: AnimationId, target: CameraTarget },
    Settling { id: AnimationId, target: CameraTarget },
}

pub struct CameraSequencer {
    config: CameraConfig,
    state: SequenceState,
    next_id: u64,
}

impl CameraSequencer {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            state: SequenceState::Idle,
            next_id: 1,
        }
    }

    pub fn phase(&self) -> CameraPhase {
        match self.state {
            SequenceState::Idle => CameraPhase::Idle,
            SequenceState::Approaching { .. } => CameraPhase::Approaching,
            SequenceState::Settling { .. } => CameraPhase::Settling,
        }
    }

    /// Target of the sequence in flight
    pub fn current_target(&self) -> Option<&CameraTarget> {
        match &self.state {
            SequenceState::Idle => None,
            SequenceState::Approaching { target, .. } | SequenceState::Settling { target, .. } => {
                Some(target)
            }
        }
    }

    /// Animation whose completion the sequencer is waiting for
    pub fn pending_animation(&self) -> Option<AnimationId> {
        match self.state {
            SequenceState::Idle => None,
            SequenceState::Approaching { id, .. } | SequenceState::Settling { id, .. } => Some(id),
        }
    }

    fn allocate_id(&mut self) -> AnimationId {
        let id = AnimationId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn animation(id: AnimationId, phase: &PhaseConfig) -> CameraAnimation {
        CameraAnimation {
            id,
            duration: phase.duration(),
            easing: phase.easing,
            allow_user_interaction: phase.allow_user_interaction,
        }
    }

    fn supersede(&mut self) {
        if let Some(stale) = self.pending_animation() {
            debug!(animation = stale.id(), phase = ?self.phase(), "superseding camera sequence");
        }
        self.state = SequenceState::Idle;
    }

    /// Begin a full approach + settle toward `target`, replacing any sequence
    /// in flight. The approach is issued immediately.
    pub fn start<R: MapRenderer + ?Sized>(
        &mut self,
        target: CameraTarget,
        renderer: &mut R,
    ) -> AnimationId {
        self.supersede();

        let id = self.allocate_id();
        debug!(
            animation = id.id(),
            lat = target.center.latitude,
            lon = target.center.longitude,
            heading = target.heading_approach,
            "camera approach"
        );
        renderer.set_camera(target.approach_pose(), Self::animation(id, &self.config.approach));
        self.state = SequenceState::Approaching { id, target };
        id
    }

    /// Move straight to the settle pose of `target` in one animation,
    /// replacing any sequence in flight
    pub fn settle_only<R: MapRenderer + ?Sized>(
        &mut self,
        target: CameraTarget,
        renderer: &mut R,
    ) -> AnimationId {
        self.supersede();

        let id = self.allocate_id();
        debug!(animation = id.id(), "camera settle without approach");
        renderer.set_camera(target.settle_pose(), Self::animation(id, &self.config.settle));
        self.state = SequenceState::Settling { id, target };
        id
    }

    /// Report that animation `id` finished. Returns true when the report
    /// belonged to the sequence in flight.
    pub fn on_animation_finished<R: MapRenderer + ?Sized>(
        &mut self,
        id: AnimationId,
        renderer: &mut R,
    ) -> bool {
        match self.state {
            SequenceState::Approaching { id: pending, target } if pending == id => {
                let settle_id = self.allocate_id();
                debug!(animation = settle_id.id(), heading = target.heading_settle, "camera settle");
                renderer.set_camera(
                    target.settle_pose(),
                    Self::animation(settle_id, &self.config.settle),
                );
                self.state = SequenceState::Settling { id: settle_id, target };
                true
            }
            SequenceState::Settling { id: pending, .. } if pending == id => {
                trace!(animation = id.id(), "camera sequence complete");
                self.state = SequenceState::Idle;
                true
            }
            _ => {
                trace!(animation = id.id(), "ignoring stale camera completion");
                false
            }
        }
    }

    /// Forget the sequence in flight without issuing anything
    pub fn cancel(&mut self) {
        self.supersede();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use crate::platform::{Easing, RecordingRenderer};
    use std::time::Duration;

    fn target(lat: f64, lon: f64) -> CameraTarget {
        CameraTarget {
            center: Coordinate::new(lat, lon),
            distance: 3000.0,
            pitch: 60.0,
            heading_approach: 120.0,
            heading_settle: 0.0,
        }
    }

    #[test]
    fn test_approach_then_settle() {
        let mut renderer = RecordingRenderer::new();
        let mut sequencer = CameraSequencer::new(CameraConfig::default());

        let approach = sequencer.start(target(1.0, 2.0), &mut renderer);
        assert_eq!(sequencer.phase(), CameraPhase::Approaching);

        let calls = renderer.camera_calls();
        assert_eq!(calls.len(), 1);
        let (pose, animation) = calls[0];
        assert_eq!(pose.heading, 120.0);
        assert_eq!(animation.id, approach);
        assert_eq!(animation.duration, Duration::from_millis(1800));
        assert_eq!(animation.easing, Easing::EaseIn);
        assert!(animation.allow_user_interaction);

        assert!(sequencer.on_animation_finished(approach, &mut renderer));
        assert_eq!(sequencer.phase(), CameraPhase::Settling);

        let (pose, animation) = renderer.last_camera().unwrap();
        assert_eq!(pose.heading, 0.0);
        assert_eq!(pose.center, Coordinate::new(1.0, 2.0));
        assert_eq!(animation.duration, Duration::from_millis(800));
        assert_eq!(animation.easing, Easing::EaseOut);

        assert!(sequencer.on_animation_finished(animation.id, &mut renderer));
        assert_eq!(sequencer.phase(), CameraPhase::Idle);
        assert_eq!(renderer.camera_calls().len(), 2);
    }

    #[test]
    fn test_settle_waits_for_approach_completion() {
        let mut renderer = RecordingRenderer::new();
        let mut sequencer = CameraSequencer::new(CameraConfig::default());

        let approach = sequencer.start(target(1.0, 2.0), &mut renderer);
        // Unrelated completion does not advance the sequence
        assert!(!sequencer.on_animation_finished(AnimationId::new(999), &mut renderer));
        assert_eq!(renderer.camera_calls().len(), 1);

        sequencer.on_animation_finished(approach, &mut renderer);
        assert_eq!(renderer.camera_calls().len(), 2);
    }

    #[test]
    fn test_new_target_supersedes_approach() {
        let mut renderer = RecordingRenderer::new();
        let mut sequencer = CameraSequencer::new(CameraConfig::default());

        let first = sequencer.start(target(1.0, 2.0), &mut renderer);
        let second = sequencer.start(target(3.0, 4.0), &mut renderer);
        assert_ne!(first, second);

        // Second approach issued without waiting on the first
        let calls = renderer.camera_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0.center, Coordinate::new(3.0, 4.0));
        assert_eq!(calls[1].0.heading, 120.0);

        // The first approach finishing late must not trigger its settle
        assert!(!sequencer.on_animation_finished(first, &mut renderer));
        assert_eq!(renderer.camera_calls().len(), 2);

        sequencer.on_animation_finished(second, &mut renderer);
        let (pose, _) = renderer.last_camera().unwrap();
        assert_eq!(pose.center, Coordinate::new(3.0, 4.0));
        assert_eq!(pose.heading, 0.0);
    }

    #[test]
    fn test_new_target_supersedes_settle() {
        let mut renderer = RecordingRenderer::new();
        let mut sequencer = CameraSequencer::new(CameraConfig::default());

        let first = sequencer.start(target(1.0, 2.0), &mut renderer);
        sequencer.on_animation_finished(first, &mut renderer);
        let stale_settle = sequencer.pending_animation().unwrap();

        sequencer.start(target(3.0, 4.0), &mut renderer);
        assert_eq!(sequencer.phase(), CameraPhase::Approaching);
        assert!(!sequencer.on_animation_finished(stale_settle, &mut renderer));
        assert_eq!(sequencer.current_target().unwrap().center, Coordinate::new(3.0, 4.0));
    }

    #[test]
    fn test_settle_only() {
        let mut renderer = RecordingRenderer::new();
        let mut sequencer = CameraSequencer::new(CameraConfig::default());

        let id = sequencer.settle_only(target(5.0, 6.0), &mut renderer);
        assert_eq!(sequencer.phase(), CameraPhase::Settling);
        let (pose, animation) = renderer.last_camera().unwrap();
        assert_eq!(pose.heading, 0.0);
        assert_eq!(animation.id, id);

        assert!(sequencer.on_animation_finished(id, &mut renderer));
        assert_eq!(sequencer.phase(), CameraPhase::Idle);
        assert_eq!(renderer.camera_calls().len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut renderer = RecordingRenderer::new();
        let mut sequencer = CameraSequencer::new(CameraConfig::default());

        let id = sequencer.start(target(1.0, 2.0), &mut renderer);
        sequencer.cancel();
        assert_eq!(sequencer.phase(), CameraPhase::Idle);
        assert!(sequencer.current_target().is_none());
        assert!(!sequencer.on_animation_finished(id, &mut renderer));
    }
}
