//! Time subsystem.
//!
//! Frame timing without coupling to the window system.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame; it reads and resets the timer

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
