//! camstream engine crate.
//!
//! Streams capture frames onto an EGL window surface: [`device`] owns the
//! display, context and surface, [`render`] draws the newest frame through two
//! transform matrices, [`frame`] carries frames from the capture thread, and
//! [`window`] binds it all to surface lifecycle events.

pub mod core;
pub mod device;
pub mod error;
pub mod frame;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
