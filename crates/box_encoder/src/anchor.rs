//! The fixed reference boxes ground truth is matched against.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::bounding_box::{BoundingBox, COORD_COUNT};
use crate::error::{Error, Result};

/// Immutable, ordered set of reference boxes.
///
/// A box's index is its identity: output slot `i` of the encoder always
/// corresponds to anchor `i`, so the input order is preserved exactly. The
/// set is never mutated after construction and can be shared freely across
/// worker threads.
#[derive(Debug, Clone)]
pub struct AnchorSet {
    boxes: Vec<BoundingBox>,
}

impl AnchorSet {
    /// Build an anchor set from a flat `(left, top, right, bottom)` list.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::AnchorCount`] if the list length is not a
    /// multiple of 4.
    pub fn from_flat(coords: &[f32]) -> Result<Self> {
        if coords.len() % COORD_COUNT != 0 {
            return Err(Error::AnchorCount(coords.len()));
        }

        let boxes: Vec<BoundingBox> = coords
            .chunks_exact(COORD_COUNT)
            .map(BoundingBox::from_slice)
            .collect();
        tracing::debug!("Built anchor set with {} boxes", boxes.len());

        Ok(AnchorSet { boxes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[must_use]
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }
}

/// SSD default-box layout, a convenience producer for [`AnchorSet::from_flat`].
///
/// One entry of `aspect_ratios` and `feature_sizes` per feature map, from the
/// largest map (smallest boxes) down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultBoxes {
    /// Extra aspect ratios per feature map, on top of the two square boxes
    /// every map gets.
    pub aspect_ratios: Vec<Vec<f32>>,
    /// Grid size (rows, columns) of each feature map.
    pub feature_sizes: Vec<(usize, usize)>,
    /// Box scale of the first feature map.
    pub min_ratio: f32,
    /// Box scale of the last feature map.
    pub max_ratio: f32,
}

impl DefaultBoxes {
    /// Emit the flat corner-format coordinate list for [`AnchorSet::from_flat`].
    ///
    /// Per feature map the box shapes are the map's scale, the geometric mean
    /// of that scale and the next, and a width/height pair per aspect ratio,
    /// following the SSD paper. Each shape is tiled over every grid cell,
    /// centered on the cell, and clamped to `[0, 1]`.
    #[must_use]
    pub fn generate(&self) -> Vec<f32> {
        let scales = self.scales();
        let mut coords = Vec::new();

        for (level, &(rows, cols)) in self.feature_sizes.iter().enumerate() {
            let shapes = self.level_shapes(level, &scales);

            for (row, col) in iproduct!(0..rows, 0..cols) {
                let cy = (row as f32 + 0.5) / rows as f32;
                let cx = (col as f32 + 0.5) / cols as f32;

                for &(width, height) in &shapes {
                    coords.push((cx - width / 2.0).clamp(0.0, 1.0));
                    coords.push((cy - height / 2.0).clamp(0.0, 1.0));
                    coords.push((cx + width / 2.0).clamp(0.0, 1.0));
                    coords.push((cy + height / 2.0).clamp(0.0, 1.0));
                }
            }
        }

        coords
    }

    /// Scales evenly spaced over `[min_ratio, max_ratio]`, one per feature
    /// map, plus a trailing `1.0` for the last map's geometric-mean shape.
    fn scales(&self) -> Vec<f32> {
        let count = self.feature_sizes.len();
        let span = self.max_ratio - self.min_ratio;

        // a single feature map keeps min_ratio as its scale
        let mut scales: Vec<f32> = (0..count)
            .map(|i| self.min_ratio + span * i as f32 / (count.max(2) - 1) as f32)
            .collect();
        scales.push(1.0);

        scales
    }

    fn level_shapes(&self, level: usize, scales: &[f32]) -> Vec<(f32, f32)> {
        let scale = scales[level];
        let scale_prime = (scale * scales[level + 1]).sqrt();

        let mut shapes = vec![(scale, scale), (scale_prime, scale_prime)];
        for &ratio in &self.aspect_ratios[level] {
            let sqrt_ratio = ratio.sqrt();
            shapes.push((scale * sqrt_ratio, scale / sqrt_ratio));
            shapes.push((scale / sqrt_ratio, scale * sqrt_ratio));
        }

        shapes
    }
}
