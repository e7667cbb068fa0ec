//! Projection-data geometry descriptors.
//!
//! The resampler only needs a narrow view of the scanner geometry: the
//! physical position of a bin along each axis, the sampling spacing at that
//! bin, the detector ring radius and the geometry family. That view is the
//! [`ProjDataGeometry`] trait. [`CylindricalGeometry`] is a simple reference
//! model of a cylindrical scanner used by the in-memory container and tests.

use crate::bin::{Axis, Bin};
use crate::volume::AxisRange;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometry family of a projection-data configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryFamily {
    /// Uniform tangential sampling.
    ArcCorrected,
    /// Cylindrical scanner without arc correction; views are interleaved.
    NonArcCorrectedCylindrical,
}

impl GeometryFamily {
    /// Whether interleaving can be removed for this family.
    pub fn supports_interleaving(self) -> bool {
        matches!(self, GeometryFamily::NonArcCorrectedCylindrical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GeometryFamily::ArcCorrected => "arc-corrected",
            GeometryFamily::NonArcCorrectedCylindrical => "non-arc-corrected cylindrical",
        }
    }
}

impl std::fmt::Display for GeometryFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index ranges of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentShape {
    pub axial: AxisRange,
    pub views: AxisRange,
    pub tangential: AxisRange,
}

impl SegmentShape {
    pub fn new(axial: AxisRange, views: AxisRange, tangential: AxisRange) -> Self {
        Self {
            axial,
            views,
            tangential,
        }
    }

    /// Ranges in storage order (axial, view, tangential).
    pub fn ranges(&self) -> [AxisRange; 3] {
        [self.axial, self.views, self.tangential]
    }

    /// Same shape with `num_views` views starting at the current first view.
    pub fn with_num_views(&self, num_views: usize) -> Self {
        Self {
            views: AxisRange::with_len(self.views.min, num_views),
            ..*self
        }
    }
}

impl std::fmt::Display for SegmentShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "axial {} x view {} x tangential {}",
            self.axial, self.views, self.tangential
        )
    }
}

/// Geometry lookup consumed by the resampler.
///
/// Positions are physical: `m` (mm) for the axial axis, `phi` (radians) for
/// the view axis and `s` (mm) for the tangential axis.
pub trait ProjDataGeometry: std::fmt::Debug + Send + Sync {
    /// Geometry family tag.
    fn family(&self) -> GeometryFamily;

    /// Inner detector ring radius in mm.
    fn ring_radius(&self) -> f64;

    /// Default intrinsic tilt of the detector blocks in radians.
    fn intrinsic_tilt(&self) -> f64;

    fn num_views(&self) -> usize;

    /// Index ranges of a segment, or `None` if the segment does not exist.
    fn segment_shape(&self, segment: i32) -> Option<SegmentShape>;

    /// Physical position of `bin` along `axis`.
    fn position(&self, axis: Axis, bin: Bin) -> f64;

    /// Sampling spacing along `axis` at `bin`.
    fn sampling(&self, axis: Axis, bin: Bin) -> f64;
}

/// Reference model of a cylindrical scanner with a single segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylindricalGeometry {
    pub family: GeometryFamily,
    pub num_views: usize,
    pub num_axial_poss: usize,
    pub tangential: AxisRange,
    /// Axial sampling in mm.
    pub axial_spacing: f64,
    /// Tangential sampling in mm at the centre of the field of view.
    pub tangential_spacing: f64,
    pub ring_radius: f64,
    pub intrinsic_tilt: f64,
    /// Angle of view 0 in radians.
    pub azimuthal_offset: f64,
}

impl CylindricalGeometry {
    /// Create a geometry covering 180 degrees in `num_views` views.
    pub fn new(
        family: GeometryFamily,
        num_views: usize,
        num_axial_poss: usize,
        tangential: AxisRange,
    ) -> Self {
        Self {
            family,
            num_views,
            num_axial_poss,
            tangential,
            axial_spacing: 2.0,
            tangential_spacing: 2.0,
            ring_radius: 400.0,
            intrinsic_tilt: 0.0,
            azimuthal_offset: 0.0,
        }
    }

    pub fn arc_corrected(num_views: usize, num_axial_poss: usize, tangential: AxisRange) -> Self {
        Self::new(GeometryFamily::ArcCorrected, num_views, num_axial_poss, tangential)
    }

    pub fn non_arc_corrected(num_views: usize, num_axial_poss: usize, tangential: AxisRange) -> Self {
        Self::new(
            GeometryFamily::NonArcCorrectedCylindrical,
            num_views,
            num_axial_poss,
            tangential,
        )
    }

    pub fn with_axial_spacing(mut self, spacing: f64) -> Self {
        self.axial_spacing = spacing;
        self
    }

    pub fn with_tangential_spacing(mut self, spacing: f64) -> Self {
        self.tangential_spacing = spacing;
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

    pub fn with_azimuthal_offset(mut self, offset: f64) -> Self {
        self.azimuthal_offset = offset;
        self
    }

    pub fn with_num_views(mut self, num_views: usize) -> Self {
        self.num_views = num_views;
        self
    }

    /// Angular spacing between consecutive views.
    pub fn view_spacing(&self) -> f64 {
        PI / self.num_views as f64
    }

    /// Angle subtended by one tangential bin at the ring.
    fn angular_increment(&self) -> f64 {
        self.tangential_spacing / self.ring_radius
    }
}

impl ProjDataGeometry for CylindricalGeometry {
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
        self.num_views
    }

    fn segment_shape(&self, segment: i32) -> Option<SegmentShape> {
        if segment != 0 {
            return None;
        }
        Some(SegmentShape::new(
            AxisRange::with_len(0, self.num_axial_poss),
            AxisRange::with_len(0, self.num_views),
            self.tangential,
        ))
    }

    fn position(&self, axis: Axis, bin: Bin) -> f64 {
        match axis {
            Axis::Axial => {
                let centre = (self.num_axial_poss as f64 - 1.0) / 2.0;
                (bin.axial_pos as f64 - centre) * self.axial_spacing
            }
            Axis::View => self.azimuthal_offset + bin.view as f64 * self.view_spacing(),
            Axis::Tangential => match self.family {
                GeometryFamily::ArcCorrected => bin.tangential_pos as f64 * self.tangential_spacing,
                GeometryFamily::NonArcCorrectedCylindrical => {
                    self.ring_radius * (bin.tangential_pos as f64 * self.angular_increment()).sin()
                }
            },
        }
    }

    fn sampling(&self, axis: Axis, bin: Bin) -> f64 {
        match axis {
            Axis::Axial => self.axial_spacing,
            Axis::View => self.view_spacing(),
            Axis::Tangential => match self.family {
                GeometryFamily::ArcCorrected => self.tangential_spacing,
                GeometryFamily::NonArcCorrectedCylindrical => {
                    self.tangential_spacing
                        * (bin.tangential_pos as f64 * self.angular_increment()).cos()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_shape() {
        let geom = CylindricalGeometry::arc_corrected(8, 5, AxisRange::symmetric(4));
        let shape = geom.segment_shape(0).unwrap();
        assert_eq!(shape.axial, AxisRange::new(0, 4));
        assert_eq!(shape.views, AxisRange::new(0, 7));
        assert_eq!(shape.tangential, AxisRange::new(-4, 4));
        assert!(geom.segment_shape(1).is_none());
        assert_eq!(shape.with_num_views(16).views, AxisRange::new(0, 15));
    }

    #[test]
    fn test_axial_position_is_centred() {
        let geom = CylindricalGeometry::arc_corrected(8, 5, AxisRange::symmetric(4));
        assert!((geom.position(Axis::Axial, Bin::new(0, 0, 2, 0))).abs() < 1e-12);
        assert!((geom.position(Axis::Axial, Bin::reference()) + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_arc_corrected_tangential_sampling() {
        let geom = CylindricalGeometry::non_arc_corrected(8, 1, AxisRange::symmetric(50));
        let centre = geom.sampling(Axis::Tangential, Bin::reference());
        let edge = geom.sampling(Axis::Tangential, Bin::new(0, 0, 0, 50));
        assert!((centre - 2.0).abs() < 1e-12);
        assert!(edge < centre);
        assert!(geom.position(Axis::Tangential, Bin::new(0, 0, 0, 50)) < 100.0);
    }

    #[test]
    fn test_view_positions() {
        let geom = CylindricalGeometry::arc_corrected(4, 1, AxisRange::symmetric(1))
            .with_azimuthal_offset(0.1);
        let phi0 = geom.position(Axis::View, Bin::reference());
        let phi1 = geom.position(Axis::View, Bin::reference().with_view(1));
        assert!((phi0 - 0.1).abs() < 1e-12);
        assert!((phi1 - phi0 - PI / 4.0).abs() < 1e-12);
    }
}
