use std::path::{Path, PathBuf};

use super::ShaderStage;

/// Locations of the three stage files that make up a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub geometry: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    /// `vertex.glsl`, `geometry.glsl` and `fragment.glsl` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vertex: dir.join("vertex.glsl"),
            geometry: dir.join("geometry.glsl"),
            fragment: dir.join("fragment.glsl"),
        }
    }

    /// Stage/path pairs in pipeline order.
    pub fn stages(&self) -> [(ShaderStage, &Path); 3] {
        [
            (ShaderStage::Vertex, self.vertex.as_path()),
            (ShaderStage::Geometry, self.geometry.as_path()),
            (ShaderStage::Fragment, self.fragment.as_path()),
        ]
    }
}
