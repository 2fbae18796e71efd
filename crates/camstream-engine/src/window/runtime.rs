use anyhow::{Context, Result};
use raw_window_handle::HasWindowHandle;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::core::SurfaceApp;
use crate::device::{NativeEgl, NativeWindow, SurfaceInit};
use crate::frame::{FrameReady, FrameSignal};

use super::ctx::Command;
use super::{RuntimeCtx, SurfaceEvent, SurfaceView};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "camstream".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Owns the winit event loop and one window, and feeds a [`SurfaceView`] with
/// lifecycle events. Frame-ready signals the app registers through
/// [`RuntimeCtx::watch_frames`] are forwarded into the loop as user events, so
/// every GL call stays on the loop thread.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, surface_init: SurfaceInit, app: A) -> Result<()>
    where
        A: SurfaceApp<NativeEgl> + 'static,
    {
        let egl = NativeEgl::load().context("failed to load libEGL")?;

        let event_loop = EventLoop::<FrameReady>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        let proxy = event_loop.create_proxy();

        let mut state = RuntimeState {
            config,
            view: SurfaceView::new(egl, surface_init, app),
            window: None,
            proxy,
            exit_requested: false,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct RuntimeState<A>
where
    A: SurfaceApp<NativeEgl> + 'static,
{
    config: RuntimeConfig,
    view: SurfaceView<NativeEgl, A>,
    window: Option<Window>,
    proxy: EventLoopProxy<FrameReady>,
    exit_requested: bool,
}

impl<A> RuntimeState<A>
where
    A: SurfaceApp<NativeEgl> + 'static,
{
    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let handle = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();
        let native = NativeWindow::from_raw(handle).context("window handle is not usable by EGL")?;
        let size = window.inner_size();

        self.window = Some(window);

        let ctx = self.view.handle(SurfaceEvent::Created(native));
        self.apply_commands(event_loop, ctx);
        self.surface_changed(event_loop, size);

        Ok(())
    }

    fn destroy_window(&mut self, event_loop: &ActiveEventLoop) {
        let ctx = self.view.handle(SurfaceEvent::Destroyed);
        self.apply_commands(event_loop, ctx);
        self.window = None;
    }

    fn surface_changed(&mut self, event_loop: &ActiveEventLoop, size: PhysicalSize<u32>) {
        let ctx = self.view.handle(SurfaceEvent::Changed {
            width: size.width,
            height: size.height,
        });
        self.apply_commands(event_loop, ctx);
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        for cmd in ctx.into_commands() {
            match cmd {
                Command::WatchFrames(signal) => {
                    if let Err(e) = forward_frames(signal, self.proxy.clone()) {
                        log::error!("failed to start frame forwarding: {e:#}");
                        self.request_exit();
                    }
                }
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

/// Relays `signal` into the event loop until either side goes away.
fn forward_frames(signal: FrameSignal, proxy: EventLoopProxy<FrameReady>) -> Result<()> {
    std::thread::Builder::new()
        .name("camstream-frame-signal".to_string())
        .spawn(move || {
            while let Some(token) = signal.wait() {
                if proxy.send_event(token).is_err() {
                    break;
                }
            }
            log::debug!("frame signal closed; forwarding stopped");
        })
        .context("failed to spawn frame forwarding thread")?;
    Ok(())
}

impl<A> ApplicationHandler<FrameReady> for RuntimeState<A>
where
    A: SurfaceApp<NativeEgl> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window surface: {e:#}");
            self.request_exit();
            event_loop.exit();
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        // The native window is invalid while suspended (Android).
        self.destroy_window(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: FrameReady) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let ctx = self.view.handle(SurfaceEvent::FrameReady);
        self.apply_commands(event_loop, ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.window.as_ref().map(Window::id) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.destroy_window(event_loop);
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => self.surface_changed(event_loop, new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(Window::inner_size) {
                    self.surface_changed(event_loop, size);
                }
            }

            // Re-present the latest frame after expose.
            WindowEvent::RedrawRequested => {
                let ctx = self.view.handle(SurfaceEvent::FrameReady);
                self.apply_commands(event_loop, ctx);
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.destroy_window(event_loop);
    }
}
