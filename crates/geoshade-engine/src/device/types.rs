use std::num::NonZeroU32;

/// Device buffer object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub NonZeroU32);

/// Device shader-stage object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderId(pub NonZeroU32);

/// Device program object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub NonZeroU32);

/// Location of a uniform inside a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Binding point a buffer is attached to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data.
    ElementArray,
}

/// Upload frequency hint.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Rewritten every frame or so.
    Dynamic,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Points,
    Triangles,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexType {
    U32,
}

/// Float vertex attribute declared over the currently bound array buffer.
///
/// `stride` and `offset` are in bytes; attributes are never normalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttrib {
    pub location: u32,
    pub components: u32,
    pub stride: u32,
    pub offset: u32,
}

impl VertexAttrib {
    #[inline]
    pub const fn new(location: u32, components: u32, stride: u32, offset: u32) -> Self {
        Self {
            location,
            components,
            stride,
            offset,
        }
    }
}
