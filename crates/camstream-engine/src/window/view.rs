use crate::core::{AppControl, SurfaceApp, SurfaceCtx, SurfaceFormat};
use crate::device::{EglApi, GpuSurface, SurfaceInit};

use super::{RuntimeCtx, SurfaceEvent};

/// Binds surface lifecycle events to a [`GpuSurface`] and a [`SurfaceApp`].
///
/// - `Created` creates the surface (releasing a superseded one first), makes it
///   current and hands it to the app.
/// - `Changed` and `FrameReady` are forwarded with the surface current.
/// - `Destroyed` notifies the app, releases the surface, then notifies the app
///   again so renderers are released after their context.
///
/// Toolkit-independent; [`Runtime`](super::Runtime) feeds it from winit.
pub struct SurfaceView<E: EglApi, A: SurfaceApp<E>> {
    egl: E,
    init: SurfaceInit,
    app: A,
    surface: Option<GpuSurface<E>>,
}

impl<E: EglApi, A: SurfaceApp<E>> SurfaceView<E, A> {
    pub fn new(egl: E, init: SurfaceInit, app: A) -> Self {
        Self {
            egl,
            init,
            app,
            surface: None,
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn surface(&self) -> Option<&GpuSurface<E>> {
        self.surface.as_ref()
    }

    /// Dispatches one event and returns the commands the app issued.
    pub fn handle(&mut self, event: SurfaceEvent<E::Window>) -> RuntimeCtx {
        let mut runtime = RuntimeCtx::default();

        let control = match event {
            SurfaceEvent::Created(window) => self.surface_created(window, &mut runtime),
            SurfaceEvent::Changed { width, height } => {
                let format = SurfaceFormat { width, height };
                log::debug!("surface changed to {width}x{height}");
                self.dispatch(&mut runtime, |app, ctx| app.on_surface_changed(ctx, format))
            }
            SurfaceEvent::FrameReady => self.dispatch(&mut runtime, |app, ctx| app.on_frame_ready(ctx)),
            SurfaceEvent::Destroyed => {
                self.surface_destroyed(&mut runtime);
                AppControl::Continue
            }
        };

        if control == AppControl::Exit {
            runtime.exit();
        }

        runtime
    }

    fn surface_created(&mut self, window: E::Window, runtime: &mut RuntimeCtx) -> AppControl {
        if self.surface.is_some() {
            log::info!("surface superseded; releasing the previous one");
            self.surface_destroyed(runtime);
        }

        match GpuSurface::create(self.egl.clone(), Some(window), None, &self.init) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                log::error!("failed to create gpu surface: {e}");
                return AppControl::Exit;
            }
        }

        self.dispatch(runtime, |app, ctx| app.on_surface_created(ctx))
    }

    fn surface_destroyed(&mut self, runtime: &mut RuntimeCtx) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };

        if let Err(e) = surface.make_current() {
            log::warn!("surface {} could not be made current before teardown: {e}", surface.id());
        }

        self.app.on_surface_destroyed(&mut SurfaceCtx {
            surface: &mut surface,
            runtime,
        });

        if let Err(e) = surface.release() {
            log::warn!("surface release failed: {e}");
        }

        self.app.on_surface_released();
    }

    fn dispatch<F>(&mut self, runtime: &mut RuntimeCtx, callback: F) -> AppControl
    where
        F: FnOnce(&mut A, &mut SurfaceCtx<'_, E>) -> AppControl,
    {
        let Some(surface) = self.surface.as_mut() else {
            log::trace!("no surface; event dropped");
            return AppControl::Continue;
        };

        if let Err(e) = surface.make_current() {
            log::error!("surface {}: {e}", surface.id());
            return AppControl::Continue;
        }

        callback(&mut self.app, &mut SurfaceCtx { surface, runtime })
    }
}

impl<E: EglApi, A: SurfaceApp<E>> Drop for SurfaceView<E, A> {
    fn drop(&mut self) {
        let mut runtime = RuntimeCtx::default();
        self.surface_destroyed(&mut runtime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::render::{FrameRenderer, RendererInit};
    use crate::testing::{EglCall, FakeDriver, FakeEgl, FakeGl, GlCall};

    struct RecordingApp {
        driver: FakeDriver,
        log: Vec<String>,
        renderer: Option<FrameRenderer<FakeGl>>,
        exit_on_frame: bool,
    }

    impl RecordingApp {
        fn new(driver: &FakeDriver) -> Self {
            Self {
                driver: driver.clone(),
                log: Vec::new(),
                renderer: None,
                exit_on_frame: false,
            }
        }

        fn submit(&self, ts: i64) {
            let renderer = self.renderer.as_ref().unwrap();
            let producer = renderer.frame_queue().unwrap().producer();
            producer.submit(Frame::rgba8(ts, 1, 1, vec![0; 4]).unwrap()).unwrap();
        }
    }

    impl SurfaceApp<FakeEgl> for RecordingApp {
        fn on_surface_created(&mut self, ctx: &mut SurfaceCtx<'_, FakeEgl>) -> AppControl {
            self.log.push(format!("created current={}", ctx.surface.is_current()));
            let renderer = FrameRenderer::new(self.driver.gl(), &RendererInit::texture_2d()).unwrap();
            ctx.runtime.watch_frames(renderer.frame_queue().unwrap().signal());
            self.renderer = Some(renderer);
            AppControl::Continue
        }

        fn on_surface_changed(
            &mut self,
            _ctx: &mut SurfaceCtx<'_, FakeEgl>,
            format: SurfaceFormat,
        ) -> AppControl {
            self.log.push(format!("changed {}x{}", format.width, format.height));
            if let Some(renderer) = &mut self.renderer {
                renderer.set_viewport(format.width, format.height);
            }
            AppControl::Continue
        }

        fn on_frame_ready(&mut self, ctx: &mut SurfaceCtx<'_, FakeEgl>) -> AppControl {
            self.log.push("frame".to_owned());
            if let Some(renderer) = &mut self.renderer {
                ctx.surface.render(renderer).unwrap();
            }
            if self.exit_on_frame {
                AppControl::Exit
            } else {
                AppControl::Continue
            }
        }

        fn on_surface_destroyed(&mut self, ctx: &mut SurfaceCtx<'_, FakeEgl>) {
            self.log.push(format!(
                "destroyed released={} live_surfaces={}",
                ctx.surface.is_released(),
                self.driver.live_surfaces()
            ));
        }

        fn on_surface_released(&mut self) {
            self.log.push(format!("released live_surfaces={}", self.driver.live_surfaces()));
            if let Some(mut renderer) = self.renderer.take() {
                renderer.release().unwrap();
            }
        }
    }

    fn view(driver: &FakeDriver) -> SurfaceView<FakeEgl, RecordingApp> {
        SurfaceView::new(driver.egl(), SurfaceInit::default(), RecordingApp::new(driver))
    }

    #[test]
    fn full_lifecycle() {
        let driver = FakeDriver::new();
        let mut view = view(&driver);

        let ctx = view.handle(SurfaceEvent::Created(1));
        assert!(!ctx.exit_requested());
        assert_eq!(ctx.into_commands().len(), 1);

        view.handle(SurfaceEvent::Changed { width: 320, height: 240 });
        view.app().submit(42);
        view.handle(SurfaceEvent::FrameReady);

        assert_eq!(driver.swaps().len(), 1);
        assert_eq!(driver.swaps()[0].1, Some(42));
        assert!(driver
            .gl_calls()
            .contains(&GlCall::Viewport { x: 0, y: 0, width: 320, height: 240 }));

        view.handle(SurfaceEvent::Destroyed);
        assert!(view.surface().is_none());
        assert!(view.app().renderer.is_none());
        assert_eq!(
            view.app().log,
            vec![
                "created current=true",
                "changed 320x240",
                "frame",
                "destroyed released=false live_surfaces=1",
                "released live_surfaces=0",
            ]
        );
    }

    #[test]
    fn new_surface_supersedes_old_one() {
        let driver = FakeDriver::new();
        let mut view = view(&driver);

        view.handle(SurfaceEvent::Created(1));
        view.handle(SurfaceEvent::Created(2));

        let calls = driver.egl_calls();
        let destroyed = calls
            .iter()
            .position(|c| matches!(c, EglCall::DestroySurface(_)))
            .unwrap();
        let second = calls
            .iter()
            .position(|c| matches!(c, EglCall::CreateSurface { window: 2, .. }))
            .unwrap();
        assert!(destroyed < second);
        assert_eq!(driver.live_surfaces(), 1);
        assert_eq!(
            view.app().log,
            vec![
                "created current=true",
                "destroyed released=false live_surfaces=1",
                "released live_surfaces=0",
                "created current=true",
            ]
        );
    }

    #[test]
    fn creation_failure_requests_exit() {
        let driver = FakeDriver::new();
        driver.remove_display();
        let mut view = view(&driver);

        let ctx = view.handle(SurfaceEvent::Created(1));
        assert!(ctx.exit_requested());
        assert!(view.app().log.is_empty());
    }

    #[test]
    fn events_without_surface_are_dropped() {
        let driver = FakeDriver::new();
        let mut view = view(&driver);

        assert!(!view.handle(SurfaceEvent::FrameReady).exit_requested());
        assert!(!view.handle(SurfaceEvent::Destroyed).exit_requested());
        assert!(view.app().log.is_empty());
    }

    #[test]
    fn app_exit_is_forwarded() {
        let driver = FakeDriver::new();
        let mut view = view(&driver);
        view.app_mut().exit_on_frame = true;

        view.handle(SurfaceEvent::Created(1));
        assert!(view.handle(SurfaceEvent::FrameReady).exit_requested());
    }

    #[test]
    fn drop_releases_live_surface() {
        let driver = FakeDriver::new();
        let mut view = view(&driver);
        view.handle(SurfaceEvent::Created(1));

        drop(view);
        assert_eq!(driver.live_surfaces(), 0);
        assert_eq!(driver.live_contexts(), 0);
    }
}
