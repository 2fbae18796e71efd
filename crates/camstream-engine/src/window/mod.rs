//! View integration.
//!
//! [`SurfaceView`] turns surface lifecycle events into surface and app calls;
//! [`Runtime`] owns the winit event loop and window that produce them.

mod ctx;
mod events;
mod runtime;
mod view;

pub use ctx::RuntimeCtx;
pub use events::SurfaceEvent;
pub use runtime::{Runtime, RuntimeConfig};
pub use view::SurfaceView;
