use std::path::Path;

use geoshade_engine::logging::LoggingConfig;
use geoshade_engine::shader::ShaderPaths;
use geoshade_engine::window::RuntimeConfig;

/// Everything the demo needs to start. No files or flags; defaults only.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub logging: LoggingConfig,
    pub runtime: RuntimeConfig,
    pub shaders: ShaderPaths,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            runtime: RuntimeConfig::default(),
            shaders: ShaderPaths::in_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_demo() {
        let config = DemoConfig::default();
        assert_eq!(config.runtime.title, "Geometry Shaders");
        assert_eq!((config.runtime.width, config.runtime.height), (800, 600));
    }

    #[test]
    fn shipped_shaders_exist() {
        let config = DemoConfig::default();
        for (stage, path) in config.shaders.stages() {
            assert!(path.is_file(), "{stage} shader missing at {}", path.display());
        }
    }
}
