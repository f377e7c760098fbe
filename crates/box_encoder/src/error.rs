//! See [`Error`].

use miette::Diagnostic;
use thiserror::Error;

/// Error types for this crate.
///
/// Both variants are configuration errors raised at construction time; a
/// failed construction yields no usable encoder. Per-sample input is never an
/// error, degenerate samples encode to background records instead.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Expected criteria in [0, 1], actual value = {0}")]
    Criteria(f32),

    #[error("Anchors size must be divisible by 4, actual value = {0}")]
    AnchorCount(usize),
}

/// Type alias for [`Result<T, Error>`].
pub type Result<T> = std::result::Result<T, Error>;
