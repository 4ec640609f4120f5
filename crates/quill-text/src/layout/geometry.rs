/// A 2D point in layout coordinates, relative to the top-left corner of the
/// text box. Glyph positions are the top-left corner of the glyph's bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a point at the origin.
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// A box without limits, used to measure the natural size of a text.
    pub fn unbounded() -> Self {
        Self::new(f32::MAX, f32::MAX)
    }

    /// Whether either side is too small to hold anything.
    pub fn is_empty(&self) -> bool {
        self.width < f32::EPSILON || self.height < f32::EPSILON
    }
}
