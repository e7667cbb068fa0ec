//! Sinogram resampling between scanner geometries
//!
//! This crate maps projection data sampled on one scanner configuration
//! onto another, keeping samples at the same physical location. It provides:
//!
//! - **Pull**: evaluate a spline fitted to the input at every output bin
//! - **Push**: the exact adjoint of pull, for iterative reconstruction
//! - **Interleaving removal**: doubles the view axis of non-arc-corrected data
//!
//! # Architecture
//!
//! ```text
//! interpolate_projdata_pull(out, in, config)
//!      │
//!      ├─► check_compatibility (family, ring radius)
//!      │
//!      ├─► pull_map: offset/step per axis
//!      │
//!      ├─► remove_interleaving (optional, 2x views)
//!      │
//!      ├─► extend_boundaries (views, then tangential)
//!      │
//!      ├─► RegularGridSpline::fit + pull
//!      │
//!      └─► ProjData::set_segment
//!
//! interpolate_projdata_push(out, in, config)
//!      │
//!      ├─► push_map (same relation as the matching pull)
//!      │
//!      ├─► RegularGridSpline::push + transposed fit, scaled by prod(step)
//!      │
//!      ├─► transpose_extend_boundaries (padding summed onto edges)
//!      │
//!      ├─► transpose_remove_interleaving | restore_interleaving
//!      │
//!      └─► ProjData::set_segment
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sinogram_common::{AxisRange, CylindricalGeometry, InMemoryProjData};
//! use sinogram_resample::{interpolate_projdata_pull, ResampleConfig, SplineKind};
//!
//! let input = InMemoryProjData::with_segment(fine_geometry, measured)?;
//! let mut output = InMemoryProjData::new(coarse_geometry);
//!
//! let config = ResampleConfig::with_spline(SplineKind::Cubic);
//! interpolate_projdata_pull(&mut output, &input, &config)?;
//! ```

pub mod config;
pub mod error;
pub mod extend;
pub mod interleave;
pub mod interpolate;
pub mod mapping;
pub mod sampling;
pub mod spline;

// Re-export commonly used types at crate root
pub use config::{InterleaveAdjoint, ResampleConfig, ViewExtension};
pub use error::{ResampleError, Result};
pub use extend::{crop_boundaries, extend_boundaries, transpose_extend_boundaries};
pub use interleave::{
    interleaved_shape, non_interleaved_shape, remove_interleaving, restore_interleaving,
    transpose_remove_interleaving,
};
pub use interpolate::{
    check_compatibility, interpolate_projdata, interpolate_projdata_pull, interpolate_projdata_push,
    interpolate_projdata_with_types, RING_RADIUS_TOLERANCE,
};
pub use mapping::{pull_map, push_map, AffineMap, MappingOptions};
pub use sampling::{
    sample_function_on_regular_grid, sample_on_regular_grid_pull, sample_on_regular_grid_push,
};
pub use spline::{RegularGridSpline, SplineKind, SplineTypes};
