/// Number of coordinates per box in flat coordinate lists.
pub const COORD_COUNT: usize = 4;

/// Axis-aligned box in corner format, normalized `[0, 1]` image coordinates.
///
/// `left <= right` and `top <= bottom` are assumed, not enforced; an inverted
/// box has zero overlap with everything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        BoundingBox {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Read a box from the first [`COORD_COUNT`] values of a flat slice.
    pub(crate) fn from_slice(coords: &[f32]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }

    pub(crate) fn coords(&self) -> [f32; COORD_COUNT] {
        [self.left, self.top, self.right, self.bottom]
    }

    #[must_use]
    pub fn area(&self) -> f32 {
        (self.right - self.left) * (self.bottom - self.top)
    }

    fn intersection(&self, other: &BoundingBox) -> f32 {
        let width = self.right.min(other.right) - self.left.max(other.left);
        let height = self.bottom.min(other.bottom) - self.top.max(other.top);

        if width <= 0.0 || height <= 0.0 {
            0.0
        } else {
            width * height
        }
    }

    /// Intersection-over-Union with `other`, in `[0, 1]`.
    ///
    /// A pair with zero union area (two degenerate boxes) yields 0 rather
    /// than dividing by zero.
    #[must_use]
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection(other);
        let union = self.area() + other.area() - intersection;

        if union == 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}
