//! Common geometry fixtures for sinogram tests.
//!
//! This module provides pre-defined scanner geometries and a uniform geometry
//! whose spacing and origin can be set freely per axis.

use sinogram_common::{
    Axis, AxisRange, Bin, CylindricalGeometry, GeometryFamily, InMemoryProjData, ProjDataGeometry,
    SampleVolume, SegmentShape,
};

/// Small cylindrical scanner setups for testing.
pub mod scanners {
    use super::*;

    /// Arc-corrected scanner with 16 views, 5 rings and 17 tangential bins.
    pub fn small_arc_corrected() -> CylindricalGeometry {
        CylindricalGeometry::arc_corrected(16, 5, AxisRange::symmetric(8))
    }

    /// Non-arc-corrected scanner with 8 views, 3 rings and 13 tangential bins.
    pub fn small_non_arc_corrected() -> CylindricalGeometry {
        CylindricalGeometry::non_arc_corrected(8, 3, AxisRange::symmetric(6))
    }

    /// The same scanner with twice the axial and tangential spacing and half
    /// the views of [`small_arc_corrected`].
    pub fn coarse_arc_corrected() -> CylindricalGeometry {
        CylindricalGeometry::arc_corrected(8, 3, AxisRange::symmetric(4))
            .with_axial_spacing(4.0)
            .with_tangential_spacing(4.0)
    }
}

/// A geometry with uniform sampling on every axis.
///
/// The physical position of index `i` along an axis is
/// `origin + i * spacing`, so step and offset between two such geometries
/// can be predicted exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformGeometry {
    pub family: GeometryFamily,
    pub ranges: [AxisRange; 3],
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    pub ring_radius: f64,
    pub intrinsic_tilt: f64,
}

impl UniformGeometry {
    /// Unit spacing, zero origin, arc-corrected.
    pub fn new(ranges: [AxisRange; 3]) -> Self {
        Self {
            family: GeometryFamily::ArcCorrected,
            ranges,
            spacing: [1.0; 3],
            origin: [0.0; 3],
            ring_radius: 400.0,
            intrinsic_tilt: 0.0,
        }
    }

    pub fn with_family(mut self, family: GeometryFamily) -> Self {
        self.family = family;
        self
    }

    pub fn with_spacing(mut self, axis: Axis, spacing: f64) -> Self {
        self.spacing[axis.index()] = spacing;
        self
    }

    pub fn with_origin(mut self, axis: Axis, origin: f64) -> Self {
        self.origin[axis.index()] = origin;
        self
    }

    pub fn with_ring_radius(mut self, radius: f64) -> Self {
        self.ring_radius = radius;
        self
    }

    pub fn with_intrinsic_tilt(mut self, tilt: f64) -> Self {
        self.intrinsic_tilt = tilt;
        self
    }
}

impl ProjDataGeometry for UniformGeometry {
    fn family(&self) -> GeometryFamily {
        self.family
    }

    fn ring_radius(&self) -> f64 {
        self.ring_radius
    }

    fn intrinsic_tilt(&self) -> f64 {
        self.intrinsic_tilt
    }

    fn num_views(&self) -> usize {
        self.ranges[Axis::View.index()].len()
    }

    fn segment_shape(&self, segment: i32) -> Option<SegmentShape> {
        let [axial, views, tangential] = self.ranges;
        (segment == 0).then(|| SegmentShape::new(axial, views, tangential))
    }

    fn position(&self, axis: Axis, bin: Bin) -> f64 {
        let index = match axis {
            Axis::Axial => bin.axial_pos,
            Axis::View => bin.view,
            Axis::Tangential => bin.tangential_pos,
        };
        let i = axis.index();
        self.origin[i] + index as f64 * self.spacing[i]
    }

    fn sampling(&self, axis: Axis, _bin: Bin) -> f64 {
        self.spacing[axis.index()]
    }
}

/// Container holding `volume` as segment 0 of `geometry`.
///
/// # Panics
///
/// Panics if the volume does not match the geometry's segment shape.
pub fn proj_data<G: ProjDataGeometry>(geometry: G, volume: SampleVolume) -> InMemoryProjData<G> {
    InMemoryProjData::with_segment(geometry, volume)
        .unwrap_or_else(|err| panic!("fixture volume does not fit geometry: {err}"))
}
