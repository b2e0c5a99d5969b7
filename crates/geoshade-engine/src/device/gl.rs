use std::cell::Cell;

use glow::HasContext;

use crate::coords::{ColorRgba, Viewport};
use crate::error::EngineError;
use crate::shader::ShaderStage;

use super::{
    BufferId, BufferTarget, BufferUsage, GraphicsDevice, IndexType, Primitive, ProgramId,
    ShaderId, UniformLocation, VertexAttrib,
};

/// OpenGL device backed by `glow`.
///
/// Core profiles refuse attribute calls without a bound vertex array object, so
/// one VAO is created and bound for the device's lifetime. It is released by
/// [`GlowDevice::release`], which the window system calls before tearing the
/// context down.
pub struct GlowDevice {
    gl: glow::Context,
    vertex_array: Cell<Option<glow::VertexArray>>,
}

impl GlowDevice {
    /// Wraps a loaded GL function table.
    ///
    /// # Safety
    ///
    /// The GL context `gl` was loaded from must be current on the calling
    /// thread, and must stay current for as long as this device or any
    /// resource created through it is alive.
    pub unsafe fn new(gl: glow::Context) -> Result<Self, EngineError> {
        let vertex_array = unsafe { gl.create_vertex_array() }
            .map_err(|e| EngineError::Initialization(format!("vertex array: {e}")))?;
        unsafe { gl.bind_vertex_array(Some(vertex_array)) };

        let version = gl.version();
        log::info!(
            "GL context ready: {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );

        Ok(Self {
            gl,
            vertex_array: Cell::new(Some(vertex_array)),
        })
    }

    /// Releases the device-wide vertex array object. Idempotent.
    pub fn release(&self) {
        if let Some(vao) = self.vertex_array.take() {
            unsafe {
                self.gl.bind_vertex_array(None);
                self.gl.delete_vertex_array(vao);
            }
            log::debug!("GL vertex array released");
        }
    }
}

fn target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
    }
}

fn primitive(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Points => glow::POINTS,
        Primitive::Triangles => glow::TRIANGLES,
    }
}

fn stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn buffer(id: BufferId) -> glow::Buffer {
    glow::NativeBuffer(id.0)
}

fn shader(id: ShaderId) -> glow::Shader {
    glow::NativeShader(id.0)
}

fn program(id: ProgramId) -> glow::Program {
    glow::NativeProgram(id.0)
}

// Every method below runs with the context current; see `GlowDevice::new`.
impl GraphicsDevice for GlowDevice {
    fn create_buffer(&self) -> Result<BufferId, EngineError> {
        let b = unsafe { self.gl.create_buffer() }
            .map_err(|e| EngineError::Initialization(format!("buffer: {e}")))?;
        Ok(BufferId(b.0))
    }

    fn bind_buffer(&self, t: BufferTarget, b: Option<BufferId>) {
        unsafe { self.gl.bind_buffer(target(t), b.map(buffer)) };
    }

    fn buffer_data(&self, t: BufferTarget, data: &[u8], u: BufferUsage) {
        unsafe { self.gl.buffer_data_u8_slice(target(t), data, usage(u)) };
    }

    fn delete_buffer(&self, b: BufferId) {
        unsafe { self.gl.delete_buffer(buffer(b)) };
    }

    fn vertex_attrib_pointer(&self, attrib: VertexAttrib) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                attrib.location,
                attrib.components as i32,
                glow::FLOAT,
                false,
                attrib.stride as i32,
                attrib.offset as i32,
            )
        };
    }

    fn enable_vertex_attrib(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) };
    }

    fn disable_vertex_attrib(&self, location: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(location) };
    }

    fn create_shader(&self, s: ShaderStage) -> Result<ShaderId, EngineError> {
        let sh = unsafe { self.gl.create_shader(stage(s)) }
            .map_err(|e| EngineError::Initialization(format!("{s} shader: {e}")))?;
        Ok(ShaderId(sh.0))
    }

    fn compile_shader(&self, s: ShaderId, source: &str) -> Result<(), String> {
        let sh = shader(s);
        unsafe {
            self.gl.shader_source(sh, source);
            self.gl.compile_shader(sh);
            if self.gl.get_shader_compile_status(sh) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(sh))
            }
        }
    }

    fn delete_shader(&self, s: ShaderId) {
        unsafe { self.gl.delete_shader(shader(s)) };
    }

    fn create_program(&self) -> Result<ProgramId, EngineError> {
        let p = unsafe { self.gl.create_program() }
            .map_err(|e| EngineError::Initialization(format!("program: {e}")))?;
        Ok(ProgramId(p.0))
    }

    fn attach_shader(&self, p: ProgramId, s: ShaderId) {
        unsafe { self.gl.attach_shader(program(p), shader(s)) };
    }

    fn detach_shader(&self, p: ProgramId, s: ShaderId) {
        unsafe { self.gl.detach_shader(program(p), shader(s)) };
    }

    fn link_program(&self, p: ProgramId) -> Result<(), String> {
        let pr = program(p);
        unsafe {
            self.gl.link_program(pr);
            if self.gl.get_program_link_status(pr) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(pr))
            }
        }
    }

    fn use_program(&self, p: Option<ProgramId>) {
        unsafe { self.gl.use_program(p.map(program)) };
    }

    fn delete_program(&self, p: ProgramId) {
        unsafe { self.gl.delete_program(program(p)) };
    }

    fn uniform_location(&self, p: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(program(p), name) }.map(|l| UniformLocation(l.0))
    }

    fn uniform_matrix3(&self, location: UniformLocation, columns: &[f32; 9]) {
        let loc = glow::NativeUniformLocation(location.0);
        unsafe { self.gl.uniform_matrix_3_f32_slice(Some(&loc), false, columns) };
    }

    fn draw_arrays(&self, p: Primitive, first: u32, count: u32) {
        unsafe { self.gl.draw_arrays(primitive(p), first as i32, count as i32) };
    }

    fn draw_elements(&self, p: Primitive, count: u32, index_type: IndexType) {
        let ty = match index_type {
            IndexType::U32 => glow::UNSIGNED_INT,
        };
        unsafe { self.gl.draw_elements(primitive(p), count as i32, ty, 0) };
    }

    fn clear(&self, color: ColorRgba) {
        unsafe {
            self.gl.clear_color(color.r, color.g, color.b, color.a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn viewport(&self, v: Viewport) {
        unsafe { self.gl.viewport(v.x, v.y, v.width as i32, v.height as i32) };
    }
}
