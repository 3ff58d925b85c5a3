//! Grid code algorithms

pub mod grid_codec;
pub mod error;

pub use grid_codec::{decode, encode, is_valid, GridArea, GridCode};
pub use error::{CodecError, CodecResult};
