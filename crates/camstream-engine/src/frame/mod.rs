//! Frame delivery from the capture device to the renderer.
//!
//! The capture side only ever writes frames and raises a [`FrameReady`]
//! token; every GL call happens on the rendering thread when the renderer
//! latches the newest frame.

mod queue;
mod signal;

pub use queue::{Frame, FrameProducer, FrameQueue, LatestFrameQueue};
pub use signal::{frame_channel, Disconnected, FrameNotifier, FrameReady, FrameSignal};
