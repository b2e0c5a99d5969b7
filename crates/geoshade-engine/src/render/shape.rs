use std::rc::Rc;

use glam::Mat3;

use crate::device::{
    BufferTarget, BufferUsage, GraphicsDevice, IndexType, Primitive, UniformLocation,
};
use crate::error::EngineError;

use super::buffer::GpuBuffer;
use super::vertex::Vertex2dColor;

/// Static indexed triangle mesh with interleaved position + color vertices.
///
/// Vertex and index data are uploaded once at construction and never written
/// again. Both buffers are released when the shape is dropped.
pub struct Shape<D: GraphicsDevice> {
    vertices: Vec<Vertex2dColor>,
    indices: Vec<u32>,
    vertex_buffer: GpuBuffer<D>,
    index_buffer: GpuBuffer<D>,
}

impl<D: GraphicsDevice> Shape<D> {
    /// Uploads `vertices` and `indices` into two static buffers.
    ///
    /// Fails with [`EngineError::Precondition`] if any index does not name a
    /// vertex; nothing is allocated in that case.
    pub fn new(
        device: Rc<D>,
        vertices: Vec<Vertex2dColor>,
        indices: Vec<u32>,
    ) -> Result<Self, EngineError> {
        if let Some((at, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(EngineError::Precondition(format!(
                "shape index {index} at position {at} is out of range for {} vertices",
                vertices.len()
            )));
        }

        let vertex_buffer = GpuBuffer::with_data(
            device.clone(),
            BufferTarget::Array,
            bytemuck::cast_slice(&vertices),
            BufferUsage::Static,
        )?;
        let index_buffer = GpuBuffer::with_data(
            device,
            BufferTarget::ElementArray,
            bytemuck::cast_slice(&indices),
            BufferUsage::Static,
        )?;

        log::debug!(
            "shape created: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Ok(Self {
            vertices,
            indices,
            vertex_buffer,
            index_buffer,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex2dColor] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Draws the mesh as a triangle list transformed by `world`.
    ///
    /// `world` goes to `uniform` as three columns, untransposed. Attribute
    /// arrays are disabled again and the index buffer unbound before returning.
    pub fn draw(&self, world: &Mat3, uniform: UniformLocation) {
        let device = self.vertex_buffer.device();

        self.vertex_buffer.bind();
        for attrib in Vertex2dColor::attributes() {
            device.vertex_attrib_pointer(attrib);
        }
        // Attribute pointers keep referencing the buffer after it is unbound.
        self.vertex_buffer.unbind();

        device.uniform_matrix3(uniform, &world.to_cols_array());

        self.index_buffer.bind();
        device.enable_vertex_attrib(0);
        device.enable_vertex_attrib(1);

        device.draw_elements(Primitive::Triangles, self.index_count(), IndexType::U32);

        device.disable_vertex_attrib(1);
        device.disable_vertex_attrib(0);
        self.index_buffer.unbind();
    }
}
