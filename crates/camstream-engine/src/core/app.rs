use crate::device::EglApi;

use super::ctx::{SurfaceCtx, SurfaceFormat};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`SurfaceView`](crate::window::SurfaceView).
///
/// Every callback that receives a [`SurfaceCtx`] runs with the surface's
/// context current on the calling thread.
pub trait SurfaceApp<E: EglApi> {
    /// A surface was created. Build GL resources (the renderer) here.
    fn on_surface_created(&mut self, ctx: &mut SurfaceCtx<'_, E>) -> AppControl;

    /// The surface changed size or format.
    fn on_surface_changed(&mut self, ctx: &mut SurfaceCtx<'_, E>, format: SurfaceFormat) -> AppControl {
        let _ = (ctx, format);
        AppControl::Continue
    }

    /// A new capture frame is waiting.
    fn on_frame_ready(&mut self, ctx: &mut SurfaceCtx<'_, E>) -> AppControl;

    /// The surface is about to be torn down; its context is still alive.
    fn on_surface_destroyed(&mut self, ctx: &mut SurfaceCtx<'_, E>) {
        let _ = ctx;
    }

    /// The surface and its context are gone. Release renderers here.
    fn on_surface_released(&mut self) {}
}
