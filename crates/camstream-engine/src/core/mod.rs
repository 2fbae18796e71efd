//! Core app-facing contracts.
//!
//! Defines the interface between the view layer (surface lifecycle events)
//! and the application that owns renderers and capture sources.

mod app;
mod ctx;

pub use app::{AppControl, SurfaceApp};
pub use ctx::{SurfaceCtx, SurfaceFormat};
