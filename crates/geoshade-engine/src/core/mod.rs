//! Frame loop.
//!
//! Ties a `WindowSystem` to a `FrameDriver`: tick, update, render, present,
//! poll, until the window asks to close. Shutdown order is fixed here so that
//! GPU resources are always released before the window system goes away.

mod frame_loop;

pub use frame_loop::{resize_viewport, run};
