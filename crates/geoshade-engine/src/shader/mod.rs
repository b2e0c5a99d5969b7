//! Shader stages and linked programs.
//!
//! Stage source is plain GLSL text, read from disk or passed in directly.
//! Compilation and linking are delegated to the `GraphicsDevice`; failures come
//! back as `EngineError` values carrying the driver's info log.

mod paths;
mod program;
mod stage;

pub use paths::ShaderPaths;
pub use program::Program;
pub use stage::{Shader, ShaderStage};
