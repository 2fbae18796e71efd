use anyhow::{Context, Result};
use camstream_engine::core::{AppControl, SurfaceApp, SurfaceCtx, SurfaceFormat};
use camstream_engine::device::NativeEgl;
use camstream_engine::render::{rotate_z, FrameRenderer, RendererInit};
use camstream_engine::time::FrameClock;

use crate::capture::TestPattern;

/// Frames between two frame-rate log lines.
const REPORT_EVERY: u64 = 120;

/// Capture resolution of the test pattern.
const PATTERN_SIZE: (u32, u32) = (640, 360);
const PATTERN_FPS: u32 = 30;

/// Renders the synthetic capture stream rotated about Z.
pub struct PreviewApp {
    rotation_degrees: f32,
    renderer: Option<FrameRenderer<glow::Context>>,
    capture: Option<TestPattern>,
    clock: FrameClock,
}

impl PreviewApp {
    pub fn new(rotation_degrees: f32) -> Self {
        Self {
            rotation_degrees,
            renderer: None,
            capture: None,
            clock: FrameClock::new(),
        }
    }

    fn start(&mut self, ctx: &mut SurfaceCtx<'_, NativeEgl>) -> Result<()> {
        let gl = ctx.surface.load_gl().context("failed to load GLES entry points")?;
        let renderer = FrameRenderer::new(gl, &RendererInit::texture_2d())
            .context("failed to build frame renderer")?;

        let degrees = self.rotation_degrees;
        renderer
            .update_model_view_projection(|mvp| Some(rotate_z(&mvp, degrees)))
            .context("failed to rotate preview")?;

        let queue = renderer.frame_queue()?;
        ctx.runtime.watch_frames(queue.signal());

        let (width, height) = PATTERN_SIZE;
        self.capture = Some(TestPattern::start(queue.producer(), width, height, PATTERN_FPS)?);
        self.renderer = Some(renderer);
        self.clock.reset();

        Ok(())
    }
}

impl SurfaceApp<NativeEgl> for PreviewApp {
    fn on_surface_created(&mut self, ctx: &mut SurfaceCtx<'_, NativeEgl>) -> AppControl {
        match self.start(ctx) {
            Ok(()) => AppControl::Continue,
            Err(e) => {
                log::error!("preview setup failed: {e:#}");
                AppControl::Exit
            }
        }
    }

    fn on_surface_changed(
        &mut self,
        _ctx: &mut SurfaceCtx<'_, NativeEgl>,
        format: SurfaceFormat,
    ) -> AppControl {
        if let Some(renderer) = &mut self.renderer {
            if !format.is_empty() {
                renderer.set_viewport(format.width, format.height);
            }
        }
        AppControl::Continue
    }

    fn on_frame_ready(&mut self, ctx: &mut SurfaceCtx<'_, NativeEgl>) -> AppControl {
        let Some(renderer) = &mut self.renderer else {
            return AppControl::Continue;
        };

        if let Err(e) = ctx.surface.render(renderer) {
            log::error!("render pass failed: {e}");
            return AppControl::Exit;
        }

        let ft = self.clock.tick(renderer.latest_timestamp());
        if ft.frame_index > 0 && ft.frame_index % REPORT_EVERY == 0 {
            let dropped = renderer.frame_queue().map(|q| q.dropped_frames()).unwrap_or(0);
            log::info!(
                "frame {}: {:.1} fps, {dropped} dropped",
                ft.frame_index,
                1.0 / ft.interval.as_secs_f64()
            );
        }

        AppControl::Continue
    }

    fn on_surface_destroyed(&mut self, _ctx: &mut SurfaceCtx<'_, NativeEgl>) {
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
    }

    fn on_surface_released(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            if let Err(e) = renderer.release() {
                log::warn!("renderer release failed: {e}");
            }
        }
    }
}
