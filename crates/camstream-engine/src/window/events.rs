/// Surface lifecycle notifications from the windowing layer.
///
/// `W` is the native window type the EGL backend binds surfaces to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceEvent<W> {
    /// A native window became available (or replaced the previous one).
    Created(W),

    /// The drawable size changed.
    Changed { width: u32, height: u32 },

    /// The capture side signalled a new frame.
    FrameReady,

    /// The native window is going away.
    Destroyed,
}
