//! Error types for projection-data containers and sample volumes.

use thiserror::Error;

/// Result type alias using ProjDataError.
pub type ProjDataResult<T> = Result<T, ProjDataError>;

/// Errors raised by sample volumes and projection-data containers.
#[derive(Debug, Error)]
pub enum ProjDataError {
    // === Shape Errors ===
    #[error("Block shape {actual} does not match segment shape {expected}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Index ranges are not regular: {0}")]
    IrregularRange(String),

    #[error("Empty index range on {0} axis")]
    EmptyRange(&'static str),

    #[error("Data length {actual} does not match index ranges (expected {expected})")]
    LengthMismatch { expected: usize, actual: usize },

    // === Container Errors ===
    #[error("Segment {0} not available")]
    SegmentNotFound(i32),
}

impl ProjDataError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an IrregularRange error.
    pub fn irregular(msg: impl Into<String>) -> Self {
        Self::IrregularRange(msg.into())
    }
}
