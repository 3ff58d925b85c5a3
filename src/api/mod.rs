//! Screen controller and output formatting
//!
//! The host owns a [`MapScreen`] and forwards platform notifications to it.

pub mod screen;
pub mod formatting;

pub use screen::{CallbackHandle, EventCallback, MapScreen, ScreenEvent};
pub use formatting::{CsvFormatter, JsonFormatter, ScreenSnapshot, TextFormatter};
