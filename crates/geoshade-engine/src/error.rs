use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Errors surfaced at the engine's external boundaries.
///
/// Everything here is reported instead of being left to the driver. The binary
/// decides what is fatal; for the demo all of them are.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Event loop, window, GL context/surface or device object creation failed.
    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("failed to read shader source {}: {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    ShaderLink { log: String },

    /// Caller-supplied data violates an invariant (e.g. an index past the vertex list).
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("failed to present frame: {0}")]
    Present(String),
}
