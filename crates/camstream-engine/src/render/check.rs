//! GL error checkpoints.

use std::fmt;

use crate::error::{Error, Result};

use super::GlApi;

/// Raw GL error code as returned by `glGetError`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlCode(pub u32);

impl GlCode {
    pub const NO_ERROR: Self = Self(0);
    pub const INVALID_ENUM: Self = Self(0x0500);
    pub const INVALID_VALUE: Self = Self(0x0501);
    pub const INVALID_OPERATION: Self = Self(0x0502);
    pub const OUT_OF_MEMORY: Self = Self(0x0505);
    pub const INVALID_FRAMEBUFFER_OPERATION: Self = Self(0x0506);

    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "GL_NO_ERROR",
            0x0500 => "GL_INVALID_ENUM",
            0x0501 => "GL_INVALID_VALUE",
            0x0502 => "GL_INVALID_OPERATION",
            0x0505 => "GL_OUT_OF_MEMORY",
            0x0506 => "GL_INVALID_FRAMEBUFFER_OPERATION",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for GlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GLES error {:#x} ({})", self.0, self.name().unwrap_or("unknown"))
    }
}

/// Fails with [`Error::Graphics`] if a GL error is pending, attributing it to `operation`.
pub(crate) fn check_gl(gl: &dyn GlApi, operation: &str) -> Result<()> {
    match gl.get_error() {
        0 => Ok(()),
        code => Err(Error::Graphics {
            code: GlCode(code),
            operation: operation.to_owned(),
        }),
    }
}
