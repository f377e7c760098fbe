//! See [`BoxEncoder`].

use ndarray::{Array1, Array2, ArrayView, ArrayView1, ArrayView2};

use crate::anchor::AnchorSet;
use crate::bounding_box::{BoundingBox, COORD_COUNT};
use crate::error::{Error, Result};
use crate::matcher;

/// Class id written for anchors left unmatched.
pub const BACKGROUND_LABEL: i32 = 0;

/// CPU implementation of the anchor target encoder.
///
/// Matches a sample's ground-truth boxes against a fixed anchor set and
/// writes one training target per anchor: the bound box's coordinates and
/// label, or a background record for unmatched anchors. Holds only immutable
/// configuration, so one instance can be shared by worker threads encoding
/// samples in parallel.
#[derive(Debug, Clone)]
pub struct BoxEncoder {
    criteria: f32,
    anchors: AnchorSet,
}

impl BoxEncoder {
    /// Create an encoder from a matching threshold and a flat anchor list.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Criteria`] if `criteria` lies outside `[0, 1]`,
    /// or with [`Error::AnchorCount`] if the anchor list length is not a
    /// multiple of 4.
    pub fn new(criteria: f32, anchors: &[f32]) -> Result<Self> {
        if !(0.0..=1.0).contains(&criteria) {
            return Err(Error::Criteria(criteria));
        }

        let anchors = AnchorSet::from_flat(anchors)?;
        Ok(BoxEncoder { criteria, anchors })
    }

    #[must_use]
    pub fn criteria(&self) -> f32 {
        self.criteria
    }

    #[must_use]
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Encode one sample's ground truth into per-anchor training targets.
    ///
    /// `boxes` has shape `[num_boxes, 4]` in corner format and `labels`
    /// shape `[num_boxes]`; `num_boxes` may be zero, which yields an
    /// all-background output. The returned coordinates have shape
    /// `[num_anchors, 4]` and the labels `[num_anchors]`, in anchor order.
    ///
    /// An unmatched anchor keeps its own coordinates and gets
    /// [`BACKGROUND_LABEL`]; a matched anchor gets the bound box's raw
    /// coordinates and label. Offset encoding against the anchor is left to
    /// the consumer.
    ///
    /// # Panics
    ///
    /// If `boxes` and `labels` disagree on the box count, or `boxes` does
    /// not have 4 columns.
    #[must_use]
    pub fn encode(
        &self,
        boxes: ArrayView2<'_, f32>,
        labels: ArrayView1<'_, i32>,
    ) -> (Array2<f32>, Array1<i32>) {
        assert_eq!(boxes.nrows(), labels.len());
        assert_eq!(boxes.ncols(), COORD_COUNT);

        let boxes = read_boxes(&boxes);
        let ious = matcher::overlap_matrix(&boxes, &self.anchors);
        let assignment = matcher::match_boxes(&ious, self.criteria);

        let mut out_boxes = Array2::zeros((self.anchors.len(), COORD_COUNT));
        let mut out_labels = Array1::from_elem(self.anchors.len(), BACKGROUND_LABEL);

        for (slot, bound) in assignment.iter().enumerate() {
            let bbox = match bound {
                Some(box_idx) => {
                    out_labels[slot] = labels[*box_idx];
                    boxes[*box_idx]
                }
                None => self.anchors.boxes()[slot],
            };
            out_boxes
                .row_mut(slot)
                .assign(&ArrayView::from(&bbox.coords()[..]));
        }

        tracing::debug!(
            "Encoded {} ground-truth boxes into {} anchor slots",
            boxes.len(),
            self.anchors.len()
        );

        (out_boxes, out_labels)
    }
}

fn read_boxes(coords: &ArrayView2<'_, f32>) -> Vec<BoundingBox> {
    coords
        .rows()
        .into_iter()
        .map(|row| BoundingBox::new(row[0], row[1], row[2], row[3]))
        .collect()
}
