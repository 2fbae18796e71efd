//! Display, context and window-surface management.
//!
//! This module is responsible for:
//! - opening and initializing the EGL display
//! - choosing an RGBA8 / ES2 / window config and creating (optionally shared) contexts
//! - binding a window surface, making it current and publishing frames with timestamps
//! - tearing everything down in a fixed order

mod egl;
mod error;
mod init;
mod native;
mod surface;

pub use egl::{attrib, EglApi};
pub use error::EglCode;
pub use init::SurfaceInit;
pub use native::{NativeEgl, NativeWindow};
pub use surface::GpuSurface;
