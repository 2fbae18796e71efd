use std::fmt;

/// Raw EGL error code as returned by `eglGetError`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EglCode(pub i32);

impl EglCode {
    pub const SUCCESS: Self = Self(0x3000);
    pub const NOT_INITIALIZED: Self = Self(0x3001);
    pub const BAD_ACCESS: Self = Self(0x3002);
    pub const BAD_ALLOC: Self = Self(0x3003);
    pub const BAD_ATTRIBUTE: Self = Self(0x3004);
    pub const BAD_CONFIG: Self = Self(0x3005);
    pub const BAD_CONTEXT: Self = Self(0x3006);
    pub const BAD_CURRENT_SURFACE: Self = Self(0x3007);
    pub const BAD_DISPLAY: Self = Self(0x3008);
    pub const BAD_MATCH: Self = Self(0x3009);
    pub const BAD_NATIVE_PIXMAP: Self = Self(0x300A);
    pub const BAD_NATIVE_WINDOW: Self = Self(0x300B);
    pub const BAD_PARAMETER: Self = Self(0x300C);
    pub const BAD_SURFACE: Self = Self(0x300D);
    pub const CONTEXT_LOST: Self = Self(0x300E);

    /// Symbolic name of the code, if it is one of the EGL 1.4 errors.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0x3000 => "EGL_SUCCESS",
            0x3001 => "EGL_NOT_INITIALIZED",
            0x3002 => "EGL_BAD_ACCESS",
            0x3003 => "EGL_BAD_ALLOC",
            0x3004 => "EGL_BAD_ATTRIBUTE",
            0x3005 => "EGL_BAD_CONFIG",
            0x3006 => "EGL_BAD_CONTEXT",
            0x3007 => "EGL_BAD_CURRENT_SURFACE",
            0x3008 => "EGL_BAD_DISPLAY",
            0x3009 => "EGL_BAD_MATCH",
            0x300A => "EGL_BAD_NATIVE_PIXMAP",
            0x300B => "EGL_BAD_NATIVE_WINDOW",
            0x300C => "EGL_BAD_PARAMETER",
            0x300D => "EGL_BAD_SURFACE",
            0x300E => "EGL_CONTEXT_LOST",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for EglCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EGL error code {:#x} ({})", self.0, self.name().unwrap_or("unknown"))
    }
}
