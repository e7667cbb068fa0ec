//! Common types shared by the sinogram resampling crates.
//!
//! - [`Bin`] and [`Axis`]: logical projection-data coordinates
//! - [`ProjDataGeometry`]: the geometry lookup interface, with the
//!   [`CylindricalGeometry`] reference model
//! - [`SampleVolume`]: a rectangular 3-axis block of sinogram samples
//! - [`ProjData`]: the projection-data container interface

pub mod bin;
pub mod error;
pub mod geometry;
pub mod projdata;
pub mod volume;

pub use bin::{Axis, Bin};
pub use error::{ProjDataError, ProjDataResult};
pub use geometry::{CylindricalGeometry, GeometryFamily, ProjDataGeometry, SegmentShape};
pub use projdata::{InMemoryProjData, ProjData};
pub use volume::{AxisRange, SampleVolume, Sinogram};
