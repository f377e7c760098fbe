//! Anchor-based training target encoding for object detection.
//!
//! Given a fixed [`AnchorSet`] of reference boxes, a [`BoxEncoder`] turns a
//! sample's ground-truth boxes and class labels into per-anchor training
//! targets: every anchor slot receives either the matched box's coordinates
//! and label, or a background record carrying the anchor's own coordinates.
//! Matching follows the SSD policy, forcing the best anchor onto every
//! ground-truth box before threshold-gating the rest.

pub mod anchor;
pub mod bounding_box;
pub mod encoder;
pub mod error;
pub mod matcher;

pub use anchor::{AnchorSet, DefaultBoxes};
pub use bounding_box::BoundingBox;
pub use encoder::{BACKGROUND_LABEL, BoxEncoder};
pub use error::{Error, Result};
