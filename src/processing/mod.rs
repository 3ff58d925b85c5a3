//! Authorization, fix and camera processing

pub mod authorization;
pub mod pipeline;
pub mod camera;

pub use authorization::{
    AuthorizationEffect, AuthorizationEvent, AuthorizationMachine, AuthorizationPolicy,
};
pub use pipeline::{FixUpdate, PositionUpdatePipeline};
pub use camera::{CameraPhase, CameraSequencer};
