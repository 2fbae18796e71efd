use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};

/// Token telling the rendering thread that a new frame is waiting.
///
/// It carries no data: the frame itself stays in the queue and is latched by
/// `FrameRenderer::update` on the rendering thread.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameReady;

/// Producer half of the frame-ready channel.
#[derive(Debug, Clone)]
pub struct FrameNotifier {
    tx: Sender<FrameReady>,
}

impl FrameNotifier {
    /// Signals that a frame is ready.
    ///
    /// Tokens coalesce: if one is already pending nothing more is queued, since
    /// the next render pass will pick up the newest frame anyway. Returns
    /// `false` once the receiving side is gone.
    pub fn notify(&self) -> bool {
        match self.tx.try_send(FrameReady) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer half of the frame-ready channel, owned by the rendering side.
#[derive(Debug, Clone)]
pub struct FrameSignal {
    rx: Receiver<FrameReady>,
}

impl FrameSignal {
    /// Blocks until a frame is ready. Returns `None` once every notifier is dropped.
    pub fn wait(&self) -> Option<FrameReady> {
        self.rx.recv().ok()
    }

    /// Waits up to `timeout`. `Ok(None)` means the timeout elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<FrameReady>, Disconnected> {
        match self.rx.recv_timeout(timeout) {
            Ok(token) => Ok(Some(token)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Disconnected),
        }
    }

    /// Takes a pending token without blocking.
    pub fn poll(&self) -> Option<FrameReady> {
        self.rx.try_recv().ok()
    }
}

/// Every [`FrameNotifier`] was dropped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Disconnected;

/// Creates a coalescing frame-ready channel.
pub fn frame_channel() -> (FrameNotifier, FrameSignal) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (FrameNotifier { tx }, FrameSignal { rx })
}
