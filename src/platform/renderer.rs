//! Map renderer capability and camera animation types

use crate::core::{CameraPose, Coordinate, Polygon};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifies one camera animation so its completion can be matched up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn new(id: u64) -> Self {
        AnimationId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Animation timing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] onto the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
        }
    }
}

/// How a single camera command should be animated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimation {
    pub id: AnimationId,
    pub duration: Duration,
    pub easing: Easing,
    pub allow_user_interaction: bool,
}

/// Map surface that draws overlays and moves the camera.
///
/// A new `set_camera` call replaces whatever animation is in flight. When an
/// animation finishes, the host reports its id back through
/// `MapScreen::on_camera_animation_finished`.
pub trait MapRenderer {
    /// Show `polygon` as the single grid overlay, replacing any previous one
    fn set_overlay(&mut self, polygon: Polygon);

    fn clear_overlay(&mut self);

    fn set_camera(&mut self, pose: CameraPose, animation: CameraAnimation);
}

/// Signed shortest rotation from `from` to `to` in degrees, in (-180, 180]
fn heading_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

impl CameraPose {
    /// Pose partway between `self` and `to` at linear progress `t`, shaped by
    /// `easing`. Heading turns the short way round.
    pub fn interpolate(&self, to: &CameraPose, t: f64, easing: Easing) -> CameraPose {
        let k = easing.apply(t);

        let start = Vector3::new(self.center.latitude, self.center.longitude, self.distance);
        let end = Vector3::new(to.center.latitude, to.center.longitude, to.distance);
        let position = start.lerp(&end, k);

        let heading = (self.heading + heading_delta(self.heading, to.heading) * k).rem_euclid(360.0);

        CameraPose {
            center: Coordinate::new(position.x, position.y),
            distance: position.z,
            pitch: self.pitch + (to.pitch - self.pitch) * k,
            heading,
        }
    }
}
