//! Time subsystem.
//!
//! - [`presentation_nanos`] is the clock frames are stamped with.
//! - one [`FrameClock`] per surface measures intervals between published frames.

mod frame_clock;
mod monotonic;

pub use frame_clock::{FrameClock, FrameTime};
pub use monotonic::presentation_nanos;
