//! Crate-level error type.
//!
//! Every fallible operation in the engine reports one of these variants. Native
//! error codes are wrapped in [`EglCode`] / [`GlCode`] so the message names the
//! symbolic constant alongside the raw value.

use thiserror::Error;

use crate::device::EglCode;
use crate::render::{GlCode, ShaderStage, TextureTarget};

/// Errors produced by the GPU pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// No display connection could be opened or initialized.
    #[error("EGL display unavailable: {detail}")]
    DisplayUnavailable { detail: String },

    /// No framebuffer configuration matched the requested attributes.
    #[error("no EGL config matches {requested}")]
    ConfigSelection { requested: String },

    /// The rendering context could not be created.
    #[error("EGL context creation failed: {detail}")]
    ContextCreation { detail: String },

    /// The window surface could not be created.
    #[error("EGL window surface creation failed: {code}")]
    SurfaceCreation { code: EglCode },

    /// `eglMakeCurrent` failed.
    #[error("eglMakeCurrent failed: {code}")]
    MakeCurrent { code: EglCode },

    /// `publish` was called without this surface being current on the calling thread.
    #[error("surface is not current on this thread")]
    NotCurrent,

    /// Presentation timestamp or buffer swap failed.
    #[error("{operation} failed: {code}")]
    Presentation { operation: &'static str, code: EglCode },

    /// A shader stage failed to compile.
    #[error("could not compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// The program failed to link.
    #[error("unable to link program: {log}")]
    ProgramLink { log: String },

    /// An attribute or uniform is missing from the linked program.
    #[error("unable to find location '{name}' in program")]
    LocationNotFound { name: String },

    /// A GL error was pending at a checkpoint.
    #[error("{code}: {operation}")]
    Graphics { code: GlCode, operation: String },

    /// A matrix updater returned no matrix or a matrix of the wrong size.
    #[error("invalid matrix update: {reason}")]
    InvalidUpdate { reason: String },

    /// A frame queue was paired with a texture target it cannot fill.
    #[error("{queue} cannot upload into {target:?} textures")]
    UnsupportedTarget {
        queue: &'static str,
        target: TextureTarget,
    },

    /// A submitted frame's pixel buffer does not match its dimensions.
    #[error("invalid frame: expected {expected} bytes of RGBA8, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    /// An operation was attempted on a released resource.
    #[error("{resource} used after release")]
    UseAfterRelease { resource: &'static str },

    /// The renderer has no live texture to draw from.
    #[error("renderer is not ready")]
    RendererNotReady,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
