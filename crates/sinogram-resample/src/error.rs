//! Error types for sinogram resampling.

use sinogram_common::{Axis, GeometryFamily, ProjDataError};
use thiserror::Error;

/// Errors that can occur while resampling projection data.
#[derive(Error, Debug)]
pub enum ResampleError {
    /// Input and output data belong to different geometry families.
    #[error("projection data must share a geometry family (input: {input}, output: {output})")]
    IncompatibleGeometry {
        input: GeometryFamily,
        output: GeometryFamily,
    },

    /// Scanners with different ring radii cannot be mapped onto each other.
    #[error("ring radius mismatch: input {input} mm, output {output} mm (tolerance {tolerance} mm)")]
    RingRadiusMismatch {
        input: f64,
        output: f64,
        tolerance: f64,
    },

    /// The operation is not defined for this geometry family.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// The index layout of a sample volume is not usable for the operation.
    #[error("unsupported index layout: {0}")]
    UnsupportedLayout(String),

    /// A sample volume has no samples along an axis that must be non-empty.
    #[error("empty index range on {0} axis")]
    EmptyRange(Axis),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading projection data failed.
    #[error("projection data error: {0}")]
    ProjData(#[from] ProjDataError),

    /// The output container refused the resampled segment.
    #[error("failed to commit resampled segment: {0}")]
    Commit(#[source] ProjDataError),
}

impl ResampleError {
    /// Create an UnsupportedGeometry error.
    pub fn unsupported_geometry(msg: impl Into<String>) -> Self {
        Self::UnsupportedGeometry(msg.into())
    }

    /// Create an UnsupportedLayout error.
    pub fn unsupported_layout(msg: impl Into<String>) -> Self {
        Self::UnsupportedLayout(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a container error raised while storing the result.
    pub fn commit(err: ProjDataError) -> Self {
        Self::Commit(err)
    }

    /// Whether this error is a configuration error (fatal, never retried).
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Commit(_) | Self::ProjData(_))
    }
}

impl From<std::io::Error> for ResampleError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ResampleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {}", err))
    }
}

/// Result type for resampling operations.
pub type Result<T> = std::result::Result<T, ResampleError>;
