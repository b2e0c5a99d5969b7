//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (buffers, programs) and issue commands
//! through the `GraphicsDevice` they were created with.
//!
//! Convention:
//! - CPU geometry is already in normalized device coordinates.
//! - Buffers are released when their owner is dropped, never earlier.

mod buffer;
mod points;
mod shape;
mod vertex;

pub use buffer::GpuBuffer;
pub use points::{rotating_points, FrameDriver, INITIAL_POINTS, POINT_COUNT};
pub use shape::Shape;
pub use vertex::Vertex2dColor;
