//! Graphics device abstraction.
//!
//! This module is responsible for:
//! - the `GraphicsDevice` command context that replaces ambient GL binding state
//! - the OpenGL implementation (`GlowDevice`)
//! - a headless implementation that records every call (`RecordingDevice`)
//!
//! Binding calls still mutate device state, but that state is reached only
//! through an explicit device value, never through globals.

mod gl;
mod recording;
mod types;

pub use gl::GlowDevice;
pub use recording::{Command, RecordingDevice};
pub use types::{
    BufferId, BufferTarget, BufferUsage, IndexType, Primitive, ProgramId, ShaderId,
    UniformLocation, VertexAttrib,
};

use crate::coords::{ColorRgba, Viewport};
use crate::error::EngineError;
use crate::shader::ShaderStage;

/// Command context for a single graphics device.
///
/// Methods take `&self`: a device is confined to one thread and owns its
/// binding state internally. Object creation is fallible; state and draw calls
/// are not checked (a real device reports misuse through its debug output).
pub trait GraphicsDevice {
    fn create_buffer(&self) -> Result<BufferId, EngineError>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>);
    /// Replaces the whole store of the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: BufferId);

    fn vertex_attrib_pointer(&self, attrib: VertexAttrib);
    fn enable_vertex_attrib(&self, location: u32);
    fn disable_vertex_attrib(&self, location: u32);

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, EngineError>;
    /// Uploads `source` and compiles it. `Err` carries the info log.
    fn compile_shader(&self, shader: ShaderId, source: &str) -> Result<(), String>;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, EngineError>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    /// Links the attached stages. `Err` carries the info log.
    fn link_program(&self, program: ProgramId) -> Result<(), String>;
    fn use_program(&self, program: Option<ProgramId>);
    fn delete_program(&self, program: ProgramId);

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Uploads a 3x3 matrix given as three consecutive columns. Never transposed.
    fn uniform_matrix3(&self, location: UniformLocation, columns: &[f32; 9]);

    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32);
    /// Draws `count` indices from the bound element buffer, starting at offset 0.
    fn draw_elements(&self, primitive: Primitive, count: u32, index_type: IndexType);

    /// Clears the color buffer to `color`.
    fn clear(&self, color: ColorRgba);
    fn viewport(&self, viewport: Viewport);
}
