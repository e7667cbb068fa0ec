//! Affine relations between the index spaces of two geometries.
//!
//! For every axis the relation `source_index = target_index * step + offset`
//! makes a target sample and the continuous source position correspond to
//! the same physical location. Pull reads the input geometry (source) to fill
//! the output geometry (target). Push uses the relation of the pull it is the
//! adjoint of, so source and target swap.

use nalgebra::Vector3;
use sinogram_common::{Axis, Bin, ProjDataGeometry};

/// Per-axis `(offset, step)` pairs in storage order (axial, view, tangential).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    pub offset: Vector3<f64>,
    pub step: Vector3<f64>,
}

impl AffineMap {
    pub fn new(offset: Vector3<f64>, step: Vector3<f64>) -> Self {
        Self { offset, step }
    }

    /// Map from a grid onto itself.
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Vector3::repeat(1.0))
    }

    /// Continuous source position of target `index` along `axis`.
    #[inline]
    pub fn coordinate(&self, axis: usize, index: i32) -> f64 {
        index as f64 * self.step[axis] + self.offset[axis]
    }

    /// Continuous source position of a target index triple.
    pub fn apply(&self, index: [i32; 3]) -> [f64; 3] {
        [
            self.coordinate(0, index[0]),
            self.coordinate(1, index[1]),
            self.coordinate(2, index[2]),
        ]
    }

    /// Ratio of target to source cell volume.
    pub fn volume_scale(&self) -> f64 {
        self.step.product()
    }
}

/// Options affecting how the relation is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingOptions {
    /// The source data has its views doubled to remove interleaving.
    pub remove_interleaving: bool,
    /// Add each geometry's intrinsic tilt to its reference angle.
    pub use_view_offset: bool,
}

/// Relation used when pulling `input` data onto the `output` grid.
pub fn pull_map(
    input: &dyn ProjDataGeometry,
    output: &dyn ProjDataGeometry,
    options: MappingOptions,
) -> AffineMap {
    relate(input, output, options)
}

/// Relation used when pushing `input` data onto the `output` grid.
pub fn push_map(
    input: &dyn ProjDataGeometry,
    output: &dyn ProjDataGeometry,
    options: MappingOptions,
) -> AffineMap {
    relate(output, input, options)
}

/// Express `target` indices as continuous `source` indices.
fn relate(
    source: &dyn ProjDataGeometry,
    target: &dyn ProjDataGeometry,
    options: MappingOptions,
) -> AffineMap {
    let reference = Bin::reference();
    let mut offset = Vector3::zeros();
    let mut step = Vector3::zeros();

    for axis in [Axis::Axial, Axis::Tangential] {
        let source_sampling = source.sampling(axis, reference);
        let target_sampling = target.sampling(axis, reference);
        let i = axis.index();
        offset[i] =
            (target.position(axis, reference) - source.position(axis, reference)) / source_sampling;
        step[i] = target_sampling / source_sampling;
    }

    let source_sampling_phi =
        view_sampling(source) / if options.remove_interleaving { 2.0 } else { 1.0 };
    let target_sampling_phi = view_sampling(target);
    let (source_tilt, target_tilt) = if options.use_view_offset {
        (source.intrinsic_tilt(), target.intrinsic_tilt())
    } else {
        (0.0, 0.0)
    };
    let source_phi = source.position(Axis::View, reference) + source_tilt;
    let target_phi = target.position(Axis::View, reference) + target_tilt;
    offset[1] = (target_phi - source_phi) / source_sampling_phi;
    step[1] = target_sampling_phi / source_sampling_phi;

    AffineMap::new(offset, step)
}

/// Angular sampling as the difference between the angles of views 1 and 0.
fn view_sampling(geometry: &dyn ProjDataGeometry) -> f64 {
    let reference = Bin::reference();
    geometry.position(Axis::View, reference.with_view(1)) - geometry.position(Axis::View, reference)
}
