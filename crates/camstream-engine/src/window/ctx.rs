use crate::frame::FrameSignal;

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Delivers a frame-ready event to the app whenever `signal` fires.
    ///
    /// Forwarding stops once every notifier of `signal` is gone.
    pub fn watch_frames(&mut self, signal: FrameSignal) {
        self.commands.push(Command::WatchFrames(signal));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn exit_requested(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::Exit))
    }

    pub(crate) fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

#[derive(Debug)]
pub(crate) enum Command {
    WatchFrames(FrameSignal),
    Exit,
}
