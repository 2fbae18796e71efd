use crate::device::{EglApi, GpuSurface};
use crate::window::RuntimeCtx;

/// Drawable size reported by the view layer, in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceFormat {
    pub width: u32,
    pub height: u32,
}

impl SurfaceFormat {
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Per-callback context passed to [`SurfaceApp`](super::SurfaceApp).
///
/// `'a` is the duration of the callback invocation.
pub struct SurfaceCtx<'a, E: EglApi> {
    pub surface: &'a mut GpuSurface<E>,
    pub runtime: &'a mut RuntimeCtx,
}
