//! Tensor-product splines on regular 3D grids.
//!
//! A [`RegularGridSpline`] holds coefficients fitted to a sample volume and
//! evaluates them at continuous index positions (pull). Its push operation is
//! the exact transpose of fitting followed by evaluation.

pub mod grid;
pub mod kernel;
pub mod prefilter;

pub use grid::RegularGridSpline;
pub use kernel::{SplineKind, SplineTypes};

/// Tolerance in index units when deciding whether a position is supported.
pub const SUPPORT_EPSILON: f64 = 0.001;
