use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::render::check::check_gl;
use crate::render::{ExternalTexture, GlApi, TextureTarget};

use super::signal::{frame_channel, FrameNotifier, FrameSignal};

const RESOURCE: &str = "frame queue";

/// Consumer side of a producer/consumer frame queue bound to one texture.
///
/// Implementations are driven only from the rendering thread.
pub trait FrameQueue {
    /// Latches the newest pending frame into `texture`, discarding older ones.
    ///
    /// Returns `Ok(false)` when nothing new arrived since the last call.
    fn update_tex_image(&mut self, gl: &dyn GlApi, texture: &ExternalTexture) -> Result<bool>;

    /// Presentation timestamp in nanoseconds of the last latched frame, `0` before the first.
    fn timestamp(&self) -> i64;

    /// Detaches the queue from its producer. Later updates fail.
    fn release(&mut self);
}

/// One captured image: tightly packed RGBA8 rows, top row first.
#[derive(Clone)]
pub struct Frame {
    timestamp_ns: i64,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn rgba8(timestamp_ns: i64, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let too_large = i32::try_from(width).is_err() || i32::try_from(height).is_err();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|_| !too_large)
            .unwrap_or(usize::MAX);

        if pixels.len() != expected {
            return Err(Error::InvalidFrame {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            timestamp_ns,
            width,
            height,
            pixels,
        })
    }

    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("timestamp_ns", &self.timestamp_ns)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &format_args!("<{} bytes>", self.pixels.len()))
            .finish()
    }
}

struct Slot {
    pending: Mutex<Option<Frame>>,
    notifier: Mutex<Option<FrameNotifier>>,
    released: AtomicBool,
    dropped: AtomicU64,
}

/// In-process frame queue holding at most one pending frame.
///
/// A newer frame replaces an unconsumed one (latest wins). Every submission
/// raises a coalescing [`FrameSignal`] token; the queue never touches GL
/// outside [`update_tex_image`](FrameQueue::update_tex_image).
///
/// Frames are uploaded with `glTexImage2D`, so only
/// [`TextureTarget::Texture2D`] textures can be fed from it. External
/// textures need a platform queue that attaches EGL images.
pub struct LatestFrameQueue {
    slot: Arc<Slot>,
    signal: FrameSignal,
    timestamp: i64,
    latched: u64,
}

impl LatestFrameQueue {
    pub fn new() -> Self {
        let (notifier, signal) = frame_channel();
        Self {
            slot: Arc::new(Slot {
                pending: Mutex::new(None),
                notifier: Mutex::new(Some(notifier)),
                released: AtomicBool::new(false),
                dropped: AtomicU64::new(0),
            }),
            signal,
            timestamp: 0,
            latched: 0,
        }
    }

    /// Creates a queue for `texture`, failing with [`Error::UnsupportedTarget`]
    /// if the texture cannot take CPU uploads.
    pub fn for_texture(texture: &ExternalTexture) -> Result<Self> {
        ensure_uploadable(texture.target())?;
        Ok(Self::new())
    }

    /// Handle the capture device writes frames into.
    pub fn producer(&self) -> FrameProducer {
        FrameProducer {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Frame-ready signal for scheduling render passes.
    ///
    /// Disconnects once the queue is released.
    pub fn signal(&self) -> FrameSignal {
        self.signal.clone()
    }

    /// Frames replaced before the renderer consumed them.
    pub fn dropped_frames(&self) -> u64 {
        self.slot.dropped.load(Ordering::Relaxed)
    }

    /// Frames latched into the texture so far.
    pub fn latched_frames(&self) -> u64 {
        self.latched
    }
}

impl Default for LatestFrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LatestFrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatestFrameQueue")
            .field("timestamp", &self.timestamp)
            .field("latched", &self.latched)
            .field("dropped", &self.dropped_frames())
            .field("released", &self.slot.released.load(Ordering::Relaxed))
            .finish()
    }
}

impl FrameQueue for LatestFrameQueue {
    fn update_tex_image(&mut self, gl: &dyn GlApi, texture: &ExternalTexture) -> Result<bool> {
        if self.slot.released.load(Ordering::Acquire) {
            return Err(Error::UseAfterRelease { resource: RESOURCE });
        }

        ensure_uploadable(texture.target())?;

        let Some(frame) = self.slot.pending.lock().take() else {
            return Ok(false);
        };

        let target = texture.target().gl_enum();
        gl.bind_texture(target, Some(texture.name().0));
        gl.tex_image_2d_rgba8(target, frame.width as i32, frame.height as i32, &frame.pixels);
        gl.bind_texture(target, None);
        check_gl(gl, "glTexImage2D frame upload")?;

        self.timestamp = frame.timestamp_ns;
        self.latched += 1;
        log::trace!("latched frame {} at {} ns", self.latched, self.timestamp);

        Ok(true)
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn release(&mut self) {
        {
            // Flip the flag under the slot lock so no submit can land afterwards.
            let mut pending = self.slot.pending.lock();
            self.slot.released.store(true, Ordering::Release);
            pending.take();
        }
        // Dropping the only notifier disconnects every FrameSignal.
        self.slot.notifier.lock().take();
        log::debug!(
            "frame queue released after {} frames ({} dropped)",
            self.latched,
            self.dropped_frames()
        );
    }
}

/// Capture-side handle of a [`LatestFrameQueue`]. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct FrameProducer {
    slot: Arc<Slot>,
}

impl FrameProducer {
    /// Hands a frame to the queue and signals the rendering thread.
    ///
    /// Never touches GL. Fails with [`Error::UseAfterRelease`] once the queue
    /// was released, which is the capture device's cue to stop.
    pub fn submit(&self, frame: Frame) -> Result<()> {
        {
            let mut pending = self.slot.pending.lock();
            if self.slot.released.load(Ordering::Acquire) {
                return Err(Error::UseAfterRelease { resource: RESOURCE });
            }
            if pending.replace(frame).is_some() {
                self.slot.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }

        if let Some(notifier) = self.slot.notifier.lock().as_ref() {
            notifier.notify();
        }

        Ok(())
    }

    pub fn is_released(&self) -> bool {
        self.slot.released.load(Ordering::Acquire)
    }
}

fn ensure_uploadable(target: TextureTarget) -> Result<()> {
    match target {
        TextureTarget::Texture2D => Ok(()),
        TextureTarget::External => Err(Error::UnsupportedTarget {
            queue: "LatestFrameQueue",
            target,
        }),
    }
}

impl fmt::Debug for FrameProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameProducer")
            .field("released", &self.is_released())
            .finish()
    }
}
