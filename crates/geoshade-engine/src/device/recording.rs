use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use crate::coords::{ColorRgba, Viewport};
use crate::error::EngineError;
use crate::shader::ShaderStage;

use super::{
    BufferId, BufferTarget, BufferUsage, GraphicsDevice, IndexType, Primitive, ProgramId,
    ShaderId, UniformLocation, VertexAttrib,
};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer(BufferId),
    BindBuffer(BufferTarget, Option<BufferId>),
    BufferData {
        target: BufferTarget,
        data: Vec<u8>,
        usage: BufferUsage,
    },
    DeleteBuffer(BufferId),
    VertexAttribPointer(VertexAttrib),
    EnableVertexAttrib(u32),
    DisableVertexAttrib(u32),
    CreateShader(ShaderId, ShaderStage),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    DetachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    DeleteProgram(ProgramId),
    UniformMatrix3(UniformLocation, [f32; 9]),
    DrawArrays {
        primitive: Primitive,
        first: u32,
        count: u32,
    },
    DrawElements {
        primitive: Primitive,
        count: u32,
        index_type: IndexType,
    },
    Clear(ColorRgba),
    Viewport(Viewport),
    /// Free-form marker inserted by collaborators (e.g. a scripted window).
    Marker(&'static str),
}

/// Headless device that records every call.
///
/// Object ids are handed out sequentially and tracked while alive, so tests can
/// assert on leaks and double frees. Uploaded data is stored per buffer, the
/// way a real device would hold it.
#[derive(Default)]
pub struct RecordingDevice {
    log: RefCell<Vec<Command>>,
    next_id: Cell<u32>,

    bound: RefCell<HashMap<BufferTarget, BufferId>>,
    contents: RefCell<HashMap<BufferId, Vec<u8>>>,

    live_buffers: RefCell<HashSet<BufferId>>,
    live_shaders: RefCell<HashSet<ShaderId>>,
    live_programs: RefCell<HashSet<ProgramId>>,

    fail_compile: Option<ShaderStage>,
    fail_link: bool,
    stages: RefCell<HashMap<ShaderId, ShaderStage>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose compiler rejects every shader of `stage`.
    pub fn failing_compile(stage: ShaderStage) -> Self {
        Self {
            fail_compile: Some(stage),
            ..Self::default()
        }
    }

    /// A device whose linker rejects every program.
    pub fn failing_link() -> Self {
        Self {
            fail_link: true,
            ..Self::default()
        }
    }

    /// Snapshot of every command recorded so far.
    pub fn commands(&self) -> Vec<Command> {
        self.log.borrow().clone()
    }

    pub fn clear_commands(&self) {
        self.log.borrow_mut().clear();
    }

    /// Appends a marker so collaborator calls can be ordered against device calls.
    pub fn mark(&self, label: &'static str) {
        self.record(Command::Marker(label));
    }

    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    pub fn live_shader_count(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn live_program_count(&self) -> usize {
        self.live_programs.borrow().len()
    }

    /// Last data uploaded into `buffer`, if any.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.contents.borrow().get(&buffer).cloned()
    }

    fn record(&self, cmd: Command) {
        self.log.borrow_mut().push(cmd);
    }

    fn next(&self) -> NonZeroU32 {
        let id = self.next_id.get().saturating_add(1);
        self.next_id.set(id);
        NonZeroU32::new(id).unwrap_or(NonZeroU32::MIN)
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(&self) -> Result<BufferId, EngineError> {
        let id = BufferId(self.next());
        self.live_buffers.borrow_mut().insert(id);
        self.record(Command::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        let mut bound = self.bound.borrow_mut();
        match buffer {
            Some(b) => {
                bound.insert(target, b);
            }
            None => {
                bound.remove(&target);
            }
        }
        self.record(Command::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        if let Some(b) = self.bound.borrow().get(&target) {
            self.contents.borrow_mut().insert(*b, data.to_vec());
        } else {
            log::warn!("RecordingDevice: buffer_data with nothing bound to {target:?}");
        }
        self.record(Command::BufferData {
            target,
            data: data.to_vec(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: BufferId) {
        assert!(
            self.live_buffers.borrow_mut().remove(&buffer),
            "RecordingDevice: {buffer:?} deleted twice or never created"
        );
        self.contents.borrow_mut().remove(&buffer);
        self.record(Command::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(&self, attrib: VertexAttrib) {
        self.record(Command::VertexAttribPointer(attrib));
    }

    fn enable_vertex_attrib(&self, location: u32) {
        self.record(Command::EnableVertexAttrib(location));
    }

    fn disable_vertex_attrib(&self, location: u32) {
        self.record(Command::DisableVertexAttrib(location));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, EngineError> {
        let id = ShaderId(self.next());
        self.live_shaders.borrow_mut().insert(id);
        self.stages.borrow_mut().insert(id, stage);
        self.record(Command::CreateShader(id, stage));
        Ok(id)
    }

    fn compile_shader(&self, shader: ShaderId, source: &str) -> Result<(), String> {
        self.record(Command::CompileShader(shader));
        let stage = self.stages.borrow().get(&shader).copied();
        if stage.is_some() && stage == self.fail_compile {
            return Err(format!("0:1(1): error: rejected ({} bytes)", source.len()));
        }
        Ok(())
    }

    fn delete_shader(&self, shader: ShaderId) {
        assert!(
            self.live_shaders.borrow_mut().remove(&shader),
            "RecordingDevice: {shader:?} deleted twice or never created"
        );
        self.stages.borrow_mut().remove(&shader);
        self.record(Command::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ProgramId, EngineError> {
        let id = ProgramId(self.next());
        self.live_programs.borrow_mut().insert(id);
        self.record(Command::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.record(Command::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.record(Command::DetachShader(program, shader));
    }

    fn link_program(&self, program: ProgramId) -> Result<(), String> {
        self.record(Command::LinkProgram(program));
        if self.fail_link {
            return Err("error: unresolved varying".to_string());
        }
        Ok(())
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(Command::UseProgram(program));
    }

    fn delete_program(&self, program: ProgramId) {
        assert!(
            self.live_programs.borrow_mut().remove(&program),
            "RecordingDevice: {program:?} deleted twice or never created"
        );
        self.record(Command::DeleteProgram(program));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        if !self.live_programs.borrow().contains(&program) || name.is_empty() {
            return None;
        }
        // Stable per name; good enough to tell uniforms apart in assertions.
        let hash = name.bytes().fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32));
        Some(UniformLocation(hash % 64))
    }

    fn uniform_matrix3(&self, location: UniformLocation, columns: &[f32; 9]) {
        self.record(Command::UniformMatrix3(location, *columns));
    }

    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32) {
        self.record(Command::DrawArrays {
            primitive,
            first,
            count,
        });
    }

    fn draw_elements(&self, primitive: Primitive, count: u32, index_type: IndexType) {
        self.record(Command::DrawElements {
            primitive,
            count,
            index_type,
        });
    }

    fn clear(&self, color: ColorRgba) {
        self.record(Command::Clear(color));
    }

    fn viewport(&self, viewport: Viewport) {
        self.record(Command::Viewport(viewport));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_object_kinds() {
        let dev = RecordingDevice::new();
        let b = dev.create_buffer().unwrap();
        let s = dev.create_shader(ShaderStage::Vertex).unwrap();
        let p = dev.create_program().unwrap();
        assert_ne!(b.0, s.0);
        assert_ne!(s.0, p.0);
    }

    #[test]
    fn buffer_data_lands_in_bound_buffer() {
        let dev = RecordingDevice::new();
        let b = dev.create_buffer().unwrap();
        dev.bind_buffer(BufferTarget::Array, Some(b));
        dev.buffer_data(BufferTarget::Array, &[1, 2, 3], BufferUsage::Static);
        dev.bind_buffer(BufferTarget::Array, None);
        assert_eq!(dev.buffer_contents(b), Some(vec![1, 2, 3]));
    }

    #[test]
    #[should_panic(expected = "deleted twice")]
    fn double_delete_panics() {
        let dev = RecordingDevice::new();
        let b = dev.create_buffer().unwrap();
        dev.delete_buffer(b);
        dev.delete_buffer(b);
    }

    #[test]
    fn failing_compile_only_hits_its_stage() {
        let dev = RecordingDevice::failing_compile(ShaderStage::Geometry);
        let v = dev.create_shader(ShaderStage::Vertex).unwrap();
        let g = dev.create_shader(ShaderStage::Geometry).unwrap();
        assert!(dev.compile_shader(v, "void main() {}").is_ok());
        assert!(dev.compile_shader(g, "void main() {}").is_err());
    }
}
