//! `libEGL` backend.

use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use khronos_egl as khr;
use raw_window_handle::RawWindowHandle;

use crate::error::{Error, Result};

use super::{EglApi, EglCode, GpuSurface};

/// `eglPresentationTimeANDROID(display, surface, nanoseconds)`.
type PresentationTimeFn =
    unsafe extern "system" fn(khr::EGLDisplay, khr::EGLSurface, i64) -> khr::Boolean;

struct Inner {
    egl: khr::DynamicInstance<khr::EGL1_4>,
    presentation_time: Option<PresentationTimeFn>,
}

/// EGL 1.4 loaded from the system `libEGL` at runtime.
#[derive(Clone)]
pub struct NativeEgl {
    inner: Arc<Inner>,
}

impl NativeEgl {
    /// Loads `libEGL` and resolves the optional presentation-time extension.
    pub fn load() -> Result<Self> {
        // SAFETY: symbols are resolved against the EGL 1.4 signatures khronos-egl declares.
        let egl = unsafe { khr::DynamicInstance::<khr::EGL1_4>::load_required() }.map_err(|e| {
            Error::DisplayUnavailable {
                detail: format!("unable to load libEGL: {e}"),
            }
        })?;

        let presentation_time = egl.get_proc_address("eglPresentationTimeANDROID").map(|f| {
            // SAFETY: the extension entry point has exactly this signature.
            unsafe { std::mem::transmute::<extern "system" fn(), PresentationTimeFn>(f) }
        });

        log::debug!(
            "libEGL loaded (eglPresentationTimeANDROID {})",
            if presentation_time.is_some() { "available" } else { "missing" }
        );

        Ok(Self {
            inner: Arc::new(Inner {
                egl,
                presentation_time,
            }),
        })
    }

    /// Address of a client API or extension function, null if unknown.
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.inner
            .egl
            .get_proc_address(name)
            .map_or(std::ptr::null(), |f| f as *const c_void)
    }

    fn last_error(&self, fallback: EglCode) -> EglCode {
        self.inner.egl.get_error().map(code).unwrap_or(fallback)
    }
}

impl fmt::Debug for NativeEgl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEgl")
            .field("presentation_time", &self.inner.presentation_time.is_some())
            .finish()
    }
}

fn code(e: khr::Error) -> EglCode {
    EglCode(e.native())
}

/// Native window pointer handed to `eglCreateWindowSurface`.
#[derive(Debug, Copy, Clone)]
pub struct NativeWindow(pub *mut c_void);

impl NativeWindow {
    /// Converts a window handle from the windowing layer.
    ///
    /// Wayland and other handle kinds that EGL cannot consume directly are rejected.
    pub fn from_raw(handle: RawWindowHandle) -> Result<Self> {
        let ptr = match handle {
            RawWindowHandle::AndroidNdk(h) => h.a_native_window.as_ptr(),
            RawWindowHandle::Xlib(h) => h.window as usize as *mut c_void,
            RawWindowHandle::Xcb(h) => h.window.get() as usize as *mut c_void,
            RawWindowHandle::Win32(h) => h.hwnd.get() as *mut c_void,
            other => {
                return Err(Error::ContextCreation {
                    detail: format!("unsupported native window handle: {other:?}"),
                });
            }
        };
        Ok(Self(ptr))
    }
}

impl EglApi for NativeEgl {
    type Display = khr::Display;
    type Config = khr::Config;
    type Context = khr::Context;
    type Surface = khr::Surface;
    type Window = NativeWindow;

    fn default_display(&self) -> Option<khr::Display> {
        // SAFETY: EGL_DEFAULT_DISPLAY is always a valid display id.
        unsafe { self.inner.egl.get_display(khr::DEFAULT_DISPLAY) }
    }

    fn initialize(&self, display: khr::Display) -> Result<(i32, i32), EglCode> {
        let version = self.inner.egl.initialize(display).map_err(code)?;
        self.inner.egl.bind_api(khr::OPENGL_ES_API).map_err(code)?;
        Ok(version)
    }

    fn choose_config(
        &self,
        display: khr::Display,
        attributes: &[i32],
    ) -> Result<Option<khr::Config>, EglCode> {
        self.inner
            .egl
            .choose_first_config(display, attributes)
            .map_err(code)
    }

    fn create_context(
        &self,
        display: khr::Display,
        config: khr::Config,
        share: Option<khr::Context>,
        attributes: &[i32],
    ) -> Result<khr::Context, EglCode> {
        self.inner
            .egl
            .create_context(display, config, share, attributes)
            .map_err(code)
    }

    fn create_window_surface(
        &self,
        display: khr::Display,
        config: khr::Config,
        window: NativeWindow,
    ) -> Result<khr::Surface, EglCode> {
        // SAFETY: `window` came from a live RawWindowHandle; the view layer
        // releases the surface before the window goes away.
        unsafe {
            self.inner
                .egl
                .create_window_surface(display, config, window.0, None)
        }
        .map_err(code)
    }

    fn make_current(
        &self,
        display: khr::Display,
        surface: Option<khr::Surface>,
        context: Option<khr::Context>,
    ) -> Result<(), EglCode> {
        self.inner
            .egl
            .make_current(display, surface, surface, context)
            .map_err(code)
    }

    fn destroy_surface(&self, display: khr::Display, surface: khr::Surface) -> Result<(), EglCode> {
        self.inner.egl.destroy_surface(display, surface).map_err(code)
    }

    fn destroy_context(&self, display: khr::Display, context: khr::Context) -> Result<(), EglCode> {
        self.inner.egl.destroy_context(display, context).map_err(code)
    }

    fn release_thread(&self) -> Result<(), EglCode> {
        self.inner.egl.release_thread().map_err(code)
    }

    fn terminate(&self, display: khr::Display) -> Result<(), EglCode> {
        self.inner.egl.terminate(display).map_err(code)
    }

    fn presentation_time(
        &self,
        display: khr::Display,
        surface: khr::Surface,
        nanos: i64,
    ) -> Result<bool, EglCode> {
        let Some(set_time) = self.inner.presentation_time else {
            return Ok(false);
        };

        // SAFETY: both handles are live; the caller owns them.
        let ok = unsafe { set_time(display.as_ptr(), surface.as_ptr(), nanos) };
        if ok == khr::TRUE {
            Ok(true)
        } else {
            Err(self.last_error(EglCode::BAD_SURFACE))
        }
    }

    fn swap_buffers(&self, display: khr::Display, surface: khr::Surface) -> Result<(), EglCode> {
        self.inner.egl.swap_buffers(display, surface).map_err(code)
    }
}

impl GpuSurface<NativeEgl> {
    /// Loads GLES entry points for this surface's context.
    ///
    /// The context must be current on the calling thread.
    pub fn load_gl(&self) -> Result<glow::Context> {
        if !self.is_current() {
            return Err(Error::NotCurrent);
        }
        let egl = self.egl().clone();
        // SAFETY: addresses come from eglGetProcAddress with the context current.
        Ok(unsafe { glow::Context::from_loader_function(|name| egl.proc_address(name)) })
    }
}
