use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::device::{GraphicsDevice, ShaderId};
use crate::error::EngineError;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    /// Runs between vertex and fragment processing; consumes and emits whole primitives.
    Geometry,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Compiled shader stage, released on drop.
pub struct Shader<D: GraphicsDevice> {
    device: Rc<D>,
    id: ShaderId,
    stage: ShaderStage,
}

impl<D: GraphicsDevice> Shader<D> {
    /// Compiles `source` as a `stage` shader.
    pub fn compile(device: Rc<D>, stage: ShaderStage, source: &str) -> Result<Self, EngineError> {
        let id = device.create_shader(stage)?;
        // Constructed first so a failed compile still releases the object.
        let shader = Self { device, id, stage };

        if let Err(log) = shader.device.compile_shader(id, source) {
            log::error!("{stage} shader compile failed:\n{log}");
            return Err(EngineError::ShaderCompile { stage, log });
        }

        log::debug!("{stage} shader compiled ({id:?})");
        Ok(shader)
    }

    /// Reads `path` and compiles it as a `stage` shader.
    pub fn from_file(
        device: Rc<D>,
        stage: ShaderStage,
        path: impl AsRef<Path>,
    ) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::ShaderSource {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("loaded {stage} shader source from {}", path.display());
        Self::compile(device, stage, &source)
    }

    #[inline]
    pub fn id(&self) -> ShaderId {
        self.id
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: GraphicsDevice> Drop for Shader<D> {
    fn drop(&mut self) {
        self.device.delete_shader(self.id);
    }
}
