use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::frame::FrameQueue;
use crate::render::{FrameRenderer, GlApi};

use super::{EglApi, SurfaceInit};

const RESOURCE: &str = "gpu surface";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Id of the surface whose context this thread last made current, `0` for none.
    static CURRENT: Cell<u64> = const { Cell::new(0) };
}

struct Bound<E: EglApi> {
    display: E::Display,
    context: E::Context,
    surface: E::Surface,
}

impl<E: EglApi> Clone for Bound<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: EglApi> Copy for Bound<E> {}

/// Owns one display connection, rendering context and window surface.
///
/// The triple is created and destroyed together. A context may share object
/// storage (textures, programs) with the context of another `GpuSurface`.
/// After [`release`](Self::release) every entry point fails with
/// [`Error::UseAfterRelease`].
pub struct GpuSurface<E: EglApi> {
    egl: E,
    id: u64,
    bound: Option<Bound<E>>,
    warned_presentation: bool,
}

impl<E: EglApi> GpuSurface<E> {
    /// Creates a context and a window surface bound to `window`.
    ///
    /// With `share` set, the new context shares object storage with it.
    /// Anything created before a failing step is torn down again.
    pub fn create(
        egl: E,
        window: Option<E::Window>,
        share: Option<E::Context>,
        init: &SurfaceInit,
    ) -> Result<Self> {
        let Some(window) = window else {
            return Err(Error::ContextCreation {
                detail: "no native window to bind the surface to".to_owned(),
            });
        };

        let display = egl.default_display().ok_or_else(|| Error::DisplayUnavailable {
            detail: "no default display connection".to_owned(),
        })?;

        let (major, minor) = egl
            .initialize(display)
            .map_err(|code| Error::DisplayUnavailable {
                detail: format!("eglInitialize: {code}"),
            })?;
        log::debug!("EGL {major}.{minor} initialized on {display:?}");

        let bound = match bind(&egl, display, window, share, init) {
            Ok(bound) => bound,
            Err(e) => {
                if let Err(code) = egl.terminate(display) {
                    log::warn!("eglTerminate after failed creation: {code}");
                }
                return Err(e);
            }
        };

        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "gpu surface {id} created: {} context {:?}{}",
            init.describe(),
            bound.context,
            if share.is_some() { " (shared)" } else { "" }
        );

        Ok(Self {
            egl,
            id,
            bound: Some(bound),
            warned_presentation: false,
        })
    }

    /// Creates a surface whose context shares object storage with `other`.
    pub fn create_shared(
        egl: E,
        window: Option<E::Window>,
        other: &GpuSurface<E>,
        init: &SurfaceInit,
    ) -> Result<Self> {
        let share = other.context()?;
        Self::create(egl, window, Some(share), init)
    }

    pub fn egl(&self) -> &E {
        &self.egl
    }

    /// Process-unique id, used in log lines.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_released(&self) -> bool {
        self.bound.is_none()
    }

    /// Rendering context handle, for sharing with another surface.
    pub fn context(&self) -> Result<E::Context> {
        Ok(self.bound()?.context)
    }

    pub fn display(&self) -> Result<E::Display> {
        Ok(self.bound()?.display)
    }

    /// Whether this surface's context is current on the calling thread.
    pub fn is_current(&self) -> bool {
        self.bound.is_some() && CURRENT.with(|c| c.get()) == self.id
    }

    /// Binds the context with this surface for draw and read on the calling thread.
    pub fn make_current(&mut self) -> Result<()> {
        let b = self.bound()?;
        self.egl
            .make_current(b.display, Some(b.surface), Some(b.context))
            .map_err(|code| Error::MakeCurrent { code })?;
        CURRENT.with(|c| c.set(self.id));
        Ok(())
    }

    /// Sets `timestamp_ns` as the presentation time of the next swap, then swaps.
    ///
    /// Requires [`make_current`](Self::make_current) on this thread first.
    /// Without the presentation-time extension the swap still happens.
    pub fn publish(&mut self, timestamp_ns: i64) -> Result<()> {
        let b = self.bound()?;
        if !self.is_current() {
            return Err(Error::NotCurrent);
        }

        match self.egl.presentation_time(b.display, b.surface, timestamp_ns) {
            Ok(true) => {}
            Ok(false) => {
                if !self.warned_presentation {
                    log::warn!("eglPresentationTimeANDROID unavailable; swapping without timestamps");
                    self.warned_presentation = true;
                }
            }
            Err(code) => {
                return Err(Error::Presentation {
                    operation: "eglPresentationTimeANDROID",
                    code,
                });
            }
        }

        self.egl
            .swap_buffers(b.display, b.surface)
            .map_err(|code| Error::Presentation {
                operation: "eglSwapBuffers",
                code,
            })?;

        log::trace!("gpu surface {} published frame at {timestamp_ns} ns", self.id);
        Ok(())
    }

    /// Runs one full pass: make current, latch the newest frame, draw and publish
    /// with the frame's timestamp.
    pub fn render<G, Q>(&mut self, renderer: &mut FrameRenderer<G, Q>) -> Result<()>
    where
        G: GlApi,
        Q: FrameQueue,
    {
        self.bound()?;
        if !renderer.is_ready() {
            return Err(Error::RendererNotReady);
        }

        self.make_current()?;
        renderer.update()?;
        renderer.draw()?;
        self.publish(renderer.latest_timestamp())
    }

    /// Uncurrents, then destroys the surface and the context, releases the
    /// thread's EGL state and closes the display.
    ///
    /// Failing steps are logged and the remaining ones still run.
    pub fn release(&mut self) -> Result<()> {
        let b = self.bound.take().ok_or(Error::UseAfterRelease { resource: RESOURCE })?;
        teardown(&self.egl, b);
        log::info!("gpu surface {} released", self.id);
        Ok(())
    }

    fn bound(&self) -> Result<Bound<E>> {
        self.bound.ok_or(Error::UseAfterRelease { resource: RESOURCE })
    }
}

impl<E: EglApi> Drop for GpuSurface<E> {
    fn drop(&mut self) {
        if let Some(b) = self.bound.take() {
            log::warn!("gpu surface {} dropped without release; tearing down", self.id);
            teardown(&self.egl, b);
        }
    }
}

impl<E: EglApi> fmt::Debug for GpuSurface<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("GpuSurface");
        s.field("id", &self.id);
        match &self.bound {
            Some(b) => s
                .field("display", &b.display)
                .field("context", &b.context)
                .field("surface", &b.surface),
            None => s.field("released", &true),
        };
        s.finish()
    }
}

fn bind<E: EglApi>(
    egl: &E,
    display: E::Display,
    window: E::Window,
    share: Option<E::Context>,
    init: &SurfaceInit,
) -> Result<Bound<E>> {
    let config = match egl.choose_config(display, &init.config_attributes()) {
        Ok(Some(config)) => config,
        Ok(None) => {
            return Err(Error::ConfigSelection {
                requested: init.describe(),
            });
        }
        Err(code) => {
            return Err(Error::ConfigSelection {
                requested: format!("{} ({code})", init.describe()),
            });
        }
    };
    log::debug!("EGL config {config:?} selected for {}", init.describe());

    let context = egl
        .create_context(display, config, share, &init.context_attributes())
        .map_err(|code| Error::ContextCreation {
            detail: format!("eglCreateContext: {code}"),
        })?;

    let surface = match egl.create_window_surface(display, config, window) {
        Ok(surface) => surface,
        Err(code) => {
            if let Err(e) = egl.destroy_context(display, context) {
                log::warn!("eglDestroyContext after failed surface creation: {e}");
            }
            return Err(Error::SurfaceCreation { code });
        }
    };

    Ok(Bound {
        display,
        context,
        surface,
    })
}

fn teardown<E: EglApi>(egl: &E, b: Bound<E>) {
    if let Err(code) = egl.make_current(b.display, None, None) {
        log::warn!("eglMakeCurrent(NO_CONTEXT) during release: {code}");
    }
    CURRENT.with(|c| c.set(0));

    if let Err(code) = egl.destroy_surface(b.display, b.surface) {
        log::warn!("eglDestroySurface during release: {code}");
    }
    if let Err(code) = egl.destroy_context(b.display, b.context) {
        log::warn!("eglDestroyContext during release: {code}");
    }
    if let Err(code) = egl.release_thread() {
        log::warn!("eglReleaseThread during release: {code}");
    }
    if let Err(code) = egl.terminate(b.display) {
        log::warn!("eglTerminate during release: {code}");
    }
}
