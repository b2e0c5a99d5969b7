//! Geoshade engine crate.
//!
//! Owns the platform + GPU pieces of the geometry-shader demo: the device
//! abstraction, owned GPU resources, shaders, the `Shape` mesh, the rotating
//! point renderer and the frame loop that drives it.

pub mod coords;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;

pub use error::EngineError;
