/// Rendering viewport in physical pixels.
///
/// Maps directly onto the device viewport call: `(x, y)` is the lower-left
/// origin, `width`/`height` the extent. No aspect-ratio correction is applied.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Full-window viewport anchored at the origin.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_is_anchored_at_origin() {
        assert_eq!(Viewport::full(400, 300), Viewport::new(0, 0, 400, 300));
    }
}
