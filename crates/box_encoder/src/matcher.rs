//! Pairwise overlap computation and the two-phase matching policy.

use ndarray::Array2;

use crate::anchor::AnchorSet;
use crate::bounding_box::BoundingBox;

/// Per-anchor assignment: `None` is background, `Some(i)` binds the anchor
/// to ground-truth box `i`.
pub type Assignment = Vec<Option<usize>>;

/// Pairwise IoU between every ground-truth box and every anchor, one row per
/// ground-truth box.
///
/// Each pair is independent, so this is a plain O(boxes * anchors) sweep.
#[must_use]
pub fn overlap_matrix(boxes: &[BoundingBox], anchors: &AnchorSet) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes.len(), anchors.len()));

    for (row, bbox) in boxes.iter().enumerate() {
        for (col, anchor) in anchors.boxes().iter().enumerate() {
            ious[[row, col]] = bbox.iou(anchor);
        }
    }

    ious
}

/// Assign each anchor to at most one ground-truth box.
///
/// Phase one binds, for every ground-truth box, the anchor with the highest
/// IoU against it, regardless of `criteria`, so no box is left without an
/// anchor. Phase two binds every remaining anchor to its best ground-truth
/// box, but only when that IoU reaches `criteria`.
///
/// Ties break to the lowest index, and phase-one bindings are never
/// overwritten by phase two. Ground-truth boxes are processed in ascending
/// order; should two boxes share a best anchor, the later box keeps it.
#[must_use]
pub fn match_boxes(ious: &Array2<f32>, criteria: f32) -> Assignment {
    let mut assignment: Assignment = vec![None; ious.ncols()];
    let mut forced = vec![false; ious.ncols()];

    for (box_idx, row) in ious.rows().into_iter().enumerate() {
        if let Some(anchor_idx) = argmax(row.iter().copied()) {
            assignment[anchor_idx] = Some(box_idx);
            forced[anchor_idx] = true;
        }
    }

    for (anchor_idx, column) in ious.columns().into_iter().enumerate() {
        if forced[anchor_idx] {
            continue;
        }

        if let Some(box_idx) = argmax(column.iter().copied()) {
            if column[box_idx] >= criteria {
                assignment[anchor_idx] = Some(box_idx);
            }
        }
    }

    assignment
}

/// Index of the first maximum, `None` for an empty sequence.
fn argmax(values: impl Iterator<Item = f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, value) in values.enumerate() {
        let better = match best {
            None => true,
            Some((_, best_value)) => value > best_value,
        };
        if better {
            best = Some((idx, value));
        }
    }

    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(coords: &[f32]) -> AnchorSet {
        AnchorSet::from_flat(coords).unwrap()
    }

    #[test]
    fn overlap_matrix_shape_and_values() {
        let anchors = anchors(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.5, 0.5]);
        let boxes = [BoundingBox::new(0.0, 0.0, 1.0, 1.0)];

        let ious = overlap_matrix(&boxes, &anchors);
        assert_eq!(ious.dim(), (1, 2));
        assert_eq!(ious[[0, 0]], 1.0);
        assert!((ious[[0, 1]] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn every_box_gets_an_anchor() {
        // neither box clears the threshold on its own
        let anchors = anchors(&[0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0]);
        let boxes = [
            BoundingBox::new(0.0, 0.0, 0.1, 0.1),
            BoundingBox::new(0.6, 0.6, 0.7, 0.7),
        ];

        let ious = overlap_matrix(&boxes, &anchors);
        let assignment = match_boxes(&ious, 1.0);

        assert_eq!(assignment, vec![Some(0), Some(1)]);
    }

    #[test]
    fn forced_match_ties_break_to_lowest_anchor() {
        // two identical anchors, identical IoU against the box
        let anchors = anchors(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        let boxes = [BoundingBox::new(0.2, 0.2, 0.8, 0.8)];

        let ious = overlap_matrix(&boxes, &anchors);
        let assignment = match_boxes(&ious, 1.0);

        assert_eq!(assignment, vec![Some(0), None]);
    }

    #[test]
    fn threshold_gates_unforced_anchors() {
        let anchors = anchors(&[
            0.0, 0.0, 1.0, 1.0, // best anchor, forced
            0.1, 0.1, 1.0, 1.0, // IoU 0.81 against the box
        ]);
        let boxes = [BoundingBox::new(0.0, 0.0, 1.0, 1.0)];
        let ious = overlap_matrix(&boxes, &anchors);

        let permissive = match_boxes(&ious, 0.5);
        assert_eq!(permissive, vec![Some(0), Some(0)]);

        let strict = match_boxes(&ious, 0.9);
        assert_eq!(strict, vec![Some(0), None]);
    }

    #[test]
    fn raising_criteria_only_removes_matches() {
        let anchors = anchors(&[
            0.0, 0.0, 0.5, 0.5, //
            0.2, 0.2, 0.7, 0.7, //
            0.5, 0.5, 1.0, 1.0, //
            0.4, 0.0, 0.9, 0.5, //
        ]);
        let boxes = [
            BoundingBox::new(0.1, 0.1, 0.6, 0.6),
            BoundingBox::new(0.5, 0.4, 1.0, 0.9),
        ];
        let ious = overlap_matrix(&boxes, &anchors);

        let loose = match_boxes(&ious, 0.0);
        let tight = match_boxes(&ious, 0.6);

        for (anchor_idx, bound) in tight.iter().enumerate() {
            if bound.is_some() {
                assert_eq!(*bound, loose[anchor_idx]);
            }
        }
    }

    #[test]
    fn forced_binding_survives_a_better_threshold_candidate() {
        // anchor 0 is the best anchor of both boxes; the later box keeps it,
        // and phase two never reassigns it to box 0 despite the 0.9 overlap
        let ious =
            Array2::from_shape_vec((2, 2), vec![0.9, 0.8, 0.3, 0.2]).unwrap();
        let assignment = match_boxes(&ious, 0.0);

        assert_eq!(assignment[0], Some(1));
        assert_eq!(assignment[1], Some(0));
    }

    #[test]
    fn no_boxes_means_all_background() {
        let ious = Array2::zeros((0, 3));
        assert_eq!(match_boxes(&ious, 0.5), vec![None, None, None]);
    }
}
