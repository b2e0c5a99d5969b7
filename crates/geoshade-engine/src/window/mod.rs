//! Window system.
//!
//! `WindowSystem` is the polling-style contract the frame loop runs against.
//! `GlWindow` implements it on top of `winit` (window + events) and `glutin`
//! (GL config, context and surface).

mod config;
mod runtime;
mod system;

pub use config::RuntimeConfig;
pub use runtime::GlWindow;
pub use system::{WindowSignal, WindowSystem};
