/// Window/context configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Requested OpenGL core version. Geometry shaders need 3.2 or later.
    pub gl_version: (u8, u8),
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Geometry Shaders".to_string(),
            width: 800,
            height: 600,
            gl_version: (3, 3),
            vsync: true,
        }
    }
}
