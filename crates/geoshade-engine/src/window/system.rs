use crate::error::EngineError;
use crate::time::FrameTime;

/// Window events the frame loop reacts to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowSignal {
    /// The drawable area changed size (physical pixels).
    Resized { width: u32, height: u32 },
}

/// Polling window system driving one render loop.
pub trait WindowSystem {
    /// True once the user (or platform) asked the window to close.
    fn should_close(&self) -> bool;

    /// Reads the frame timer and restarts it.
    fn tick(&mut self) -> FrameTime;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<(), EngineError>;

    /// Processes pending platform events without blocking.
    fn poll_events(&mut self) -> Vec<WindowSignal>;

    /// Tears down the window and its context. GPU resources must already be released.
    fn terminate(self);
}
