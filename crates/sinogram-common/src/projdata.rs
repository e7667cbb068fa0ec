//! Projection-data containers.

use crate::error::{ProjDataError, ProjDataResult};
use crate::geometry::{CylindricalGeometry, ProjDataGeometry};
use crate::volume::SampleVolume;
use std::collections::BTreeMap;
use tracing::debug;

/// A store of projection data, one [`SampleVolume`] per segment.
pub trait ProjData {
    /// Geometry describing every segment in this container.
    fn geometry(&self) -> &dyn ProjDataGeometry;

    /// Read a copy of a segment.
    fn segment(&self, segment: i32) -> ProjDataResult<SampleVolume>;

    /// Replace a segment. The block must cover exactly the segment's ranges.
    fn set_segment(&mut self, segment: i32, volume: &SampleVolume) -> ProjDataResult<()>;

    /// A zero-filled block with the ranges of `segment`.
    fn empty_segment(&self, segment: i32) -> ProjDataResult<SampleVolume> {
        let shape = self
            .geometry()
            .segment_shape(segment)
            .ok_or(ProjDataError::SegmentNotFound(segment))?;
        Ok(SampleVolume::zeros(shape.ranges()))
    }
}

/// Projection data held in memory. Segments never written read as zeros.
#[derive(Debug, Clone)]
pub struct InMemoryProjData<G = CylindricalGeometry> {
    geometry: G,
    segments: BTreeMap<i32, SampleVolume>,
}

impl<G: ProjDataGeometry> InMemoryProjData<G> {
    /// Create an empty container for `geometry`.
    pub fn new(geometry: G) -> Self {
        Self {
            geometry,
            segments: BTreeMap::new(),
        }
    }

    /// Create a container holding `volume` as segment 0.
    pub fn with_segment(geometry: G, volume: SampleVolume) -> ProjDataResult<Self> {
        let mut data = Self::new(geometry);
        data.check_shape(0, &volume)?;
        data.segments.insert(0, volume);
        Ok(data)
    }

    /// Concrete geometry of this container.
    pub fn descriptor(&self) -> &G {
        &self.geometry
    }

    /// Borrow a stored segment without copying.
    pub fn segment_ref(&self, segment: i32) -> Option<&SampleVolume> {
        self.segments.get(&segment)
    }

    fn check_shape(&self, segment: i32, volume: &SampleVolume) -> ProjDataResult<()> {
        let shape = self
            .geometry
            .segment_shape(segment)
            .ok_or(ProjDataError::SegmentNotFound(segment))?;
        if volume.ranges() != shape.ranges() {
            return Err(ProjDataError::shape_mismatch(shape, volume.describe()));
        }
        Ok(())
    }
}

impl<G: ProjDataGeometry> ProjData for InMemoryProjData<G> {
    fn geometry(&self) -> &dyn ProjDataGeometry {
        &self.geometry
    }

    fn segment(&self, segment: i32) -> ProjDataResult<SampleVolume> {
        match self.segments.get(&segment) {
            Some(volume) => Ok(volume.clone()),
            None => self.empty_segment(segment),
        }
    }

    fn set_segment(&mut self, segment: i32, volume: &SampleVolume) -> ProjDataResult<()> {
        self.check_shape(segment, volume)?;
        debug!(segment, shape = %volume.describe(), "Storing segment");
        self.segments.insert(segment, volume.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::AxisRange;

    fn geometry() -> CylindricalGeometry {
        CylindricalGeometry::arc_corrected(4, 2, AxisRange::symmetric(3))
    }

    #[test]
    fn test_unwritten_segment_reads_zeros() {
        let data = InMemoryProjData::new(geometry());
        let seg = data.segment(0).unwrap();
        assert_eq!(seg.shape(), [2, 4, 7]);
        assert!(seg.data().iter().all(|&v| v == 0.0));
        assert!(matches!(data.segment(1), Err(ProjDataError::SegmentNotFound(1))));
    }

    #[test]
    fn test_set_segment_roundtrip() {
        let mut data = InMemoryProjData::new(geometry());
        let mut seg = data.empty_segment(0).unwrap();
        seg[[1, 3, -3]] = 7.0;
        data.set_segment(0, &seg).unwrap();
        assert_eq!(data.segment(0).unwrap()[[1, 3, -3]], 7.0);
    }

    #[test]
    fn test_set_segment_rejects_wrong_shape() {
        let mut data = InMemoryProjData::new(geometry());
        let wrong = SampleVolume::zeros([
            AxisRange::new(0, 1),
            AxisRange::new(0, 7),
            AxisRange::symmetric(3),
        ]);
        let err = data.set_segment(0, &wrong).unwrap_err();
        assert!(matches!(err, ProjDataError::ShapeMismatch { .. }));
        assert!(data.segment_ref(0).is_none());
    }
}
