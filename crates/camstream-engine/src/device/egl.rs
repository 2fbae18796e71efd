use std::fmt;

use super::EglCode;

/// EGL attribute names and values used when choosing configs and creating contexts.
pub mod attrib {
    pub const NONE: i32 = 0x3038;
    pub const ALPHA_SIZE: i32 = 0x3021;
    pub const BLUE_SIZE: i32 = 0x3022;
    pub const GREEN_SIZE: i32 = 0x3023;
    pub const RED_SIZE: i32 = 0x3024;
    pub const SURFACE_TYPE: i32 = 0x3033;
    pub const RENDERABLE_TYPE: i32 = 0x3040;
    pub const CONTEXT_CLIENT_VERSION: i32 = 0x3098;
    pub const RECORDABLE_ANDROID: i32 = 0x3142;

    pub const WINDOW_BIT: i32 = 0x0004;
    pub const OPENGL_ES2_BIT: i32 = 0x0004;
}

/// The slice of EGL the surface manager drives.
///
/// Handles are plain copyable values; ownership and teardown order are the
/// responsibility of [`GpuSurface`](super::GpuSurface). Every method reports the
/// native `eglGetError` code on failure.
pub trait EglApi: Clone {
    type Display: Copy + fmt::Debug;
    type Config: Copy + fmt::Debug;
    type Context: Copy + fmt::Debug;
    type Surface: Copy + fmt::Debug;
    type Window: Copy + fmt::Debug;

    /// Returns the default display connection, or `None` if there is none.
    fn default_display(&self) -> Option<Self::Display>;

    /// Initializes the display and returns its `(major, minor)` EGL version.
    fn initialize(&self, display: Self::Display) -> Result<(i32, i32), EglCode>;

    /// Returns the first config matching the `NONE`-terminated attribute list.
    fn choose_config(
        &self,
        display: Self::Display,
        attributes: &[i32],
    ) -> Result<Option<Self::Config>, EglCode>;

    fn create_context(
        &self,
        display: Self::Display,
        config: Self::Config,
        share: Option<Self::Context>,
        attributes: &[i32],
    ) -> Result<Self::Context, EglCode>;

    fn create_window_surface(
        &self,
        display: Self::Display,
        config: Self::Config,
        window: Self::Window,
    ) -> Result<Self::Surface, EglCode>;

    /// Binds `surface` for draw and read plus `context` on the calling thread.
    ///
    /// Passing `None` for both releases whatever is current.
    fn make_current(
        &self,
        display: Self::Display,
        surface: Option<Self::Surface>,
        context: Option<Self::Context>,
    ) -> Result<(), EglCode>;

    fn destroy_surface(&self, display: Self::Display, surface: Self::Surface)
    -> Result<(), EglCode>;

    fn destroy_context(&self, display: Self::Display, context: Self::Context)
    -> Result<(), EglCode>;

    /// Releases per-thread EGL state.
    fn release_thread(&self) -> Result<(), EglCode>;

    fn terminate(&self, display: Self::Display) -> Result<(), EglCode>;

    /// Sets the presentation time of the next swap on `surface`.
    ///
    /// Returns `Ok(false)` when the platform has no presentation-time extension.
    fn presentation_time(
        &self,
        display: Self::Display,
        surface: Self::Surface,
        nanos: i64,
    ) -> Result<bool, EglCode>;

    fn swap_buffers(&self, display: Self::Display, surface: Self::Surface) -> Result<(), EglCode>;
}
