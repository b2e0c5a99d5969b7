use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

use crate::coords::ColorRgba;
use crate::device::VertexAttrib;

/// Interleaved 2D position + RGBA color vertex.
///
/// Layout: `[x, y, r, g, b, a]`, 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex2dColor {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2dColor {
    pub const STRIDE: u32 = size_of::<Vertex2dColor>() as u32;
    pub const POSITION_OFFSET: u32 = offset_of!(Vertex2dColor, position) as u32;
    pub const COLOR_OFFSET: u32 = offset_of!(Vertex2dColor, color) as u32;

    #[inline]
    pub const fn new(x: f32, y: f32, color: ColorRgba) -> Self {
        Self {
            position: [x, y],
            color: color.to_array(),
        }
    }

    /// Attribute 0 = position (2 floats), attribute 1 = color (4 floats).
    pub const fn attributes() -> [VertexAttrib; 2] {
        [
            VertexAttrib::new(0, 2, Self::STRIDE, Self::POSITION_OFFSET),
            VertexAttrib::new(1, 4, Self::STRIDE, Self::COLOR_OFFSET),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_declared_attributes() {
        assert_eq!(Vertex2dColor::STRIDE, 24);
        assert_eq!(Vertex2dColor::POSITION_OFFSET, 0);
        // Color starts right after the two position floats.
        assert_eq!(Vertex2dColor::COLOR_OFFSET as usize, size_of::<[f32; 2]>());
    }

    #[test]
    fn bytes_are_interleaved() {
        let verts = [
            Vertex2dColor::new(1.0, 2.0, ColorRgba::red()),
            Vertex2dColor::new(3.0, 4.0, ColorRgba::blue()),
        ];
        let floats: &[f32] = bytemuck::cast_slice(&verts);
        assert_eq!(
            floats,
            &[1.0, 2.0, 1.0, 0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 0.0, 1.0, 1.0]
        );
    }
}
