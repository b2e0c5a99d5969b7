//! Small value types shared by the device layer and renderers.
//!
//! Vector and matrix math comes from `glam`; this module only holds the types
//! that map one-to-one onto device calls.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
