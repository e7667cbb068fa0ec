//! Boundary extension of sample volumes along the view and tangential axes.
//!
//! Interpolation near the first and last view or tangential position needs
//! one extra sample beyond the edge. Extension builds a new volume one index
//! larger at each end; the transposed operations shrink it again and add the
//! padding back onto the samples it was copied from.

use crate::config::ViewExtension;
use crate::error::{ResampleError, Result};
use sinogram_common::{Axis, AxisRange, SampleVolume};

/// Grow the view axis by one index at each end.
pub fn extend_views(volume: &SampleVolume, mode: ViewExtension) -> Result<SampleVolume> {
    let [ra, rv, rt] = volume.ranges();
    non_empty(rv, Axis::View)?;
    if mode == ViewExtension::Periodic {
        symmetric_tangential(rt)?;
    }

    Ok(SampleVolume::from_fn([ra, rv.grow(1), rt], |a, v, t| {
        if v < rv.min {
            match mode {
                ViewExtension::Replicate => volume[[a, rv.min, t]],
                ViewExtension::Periodic => volume[[a, rv.max, -t]],
            }
        } else if v > rv.max {
            match mode {
                ViewExtension::Replicate => volume[[a, rv.max, t]],
                ViewExtension::Periodic => volume[[a, rv.min, -t]],
            }
        } else {
            volume[[a, v, t]]
        }
    }))
}

/// Transpose of [`extend_views`].
pub fn transpose_extend_views(extended: &SampleVolume, mode: ViewExtension) -> Result<SampleVolume> {
    let [ra, ext_rv, rt] = extended.ranges();
    let rv = ext_rv.shrink(1);
    non_empty(rv, Axis::View)?;
    if mode == ViewExtension::Periodic {
        symmetric_tangential(rt)?;
    }

    let mut out = crop(extended, [ra, rv, rt]);
    for a in ra.iter() {
        for t in rt.iter() {
            let low = extended[[a, ext_rv.min, t]];
            let high = extended[[a, ext_rv.max, t]];
            match mode {
                ViewExtension::Replicate => {
                    out[[a, rv.min, t]] += low;
                    out[[a, rv.max, t]] += high;
                }
                ViewExtension::Periodic => {
                    out[[a, rv.max, -t]] += low;
                    out[[a, rv.min, -t]] += high;
                }
            }
        }
    }
    Ok(out)
}

/// Grow the tangential axis by one index at each end, replicating the edges.
pub fn extend_tangential(volume: &SampleVolume) -> Result<SampleVolume> {
    let [ra, rv, rt] = volume.ranges();
    non_empty(rt, Axis::Tangential)?;

    Ok(SampleVolume::from_fn([ra, rv, rt.grow(1)], |a, v, t| {
        volume[[a, v, t.clamp(rt.min, rt.max)]]
    }))
}

/// Transpose of [`extend_tangential`].
pub fn transpose_extend_tangential(extended: &SampleVolume) -> Result<SampleVolume> {
    let [ra, rv, ext_rt] = extended.ranges();
    let rt = ext_rt.shrink(1);
    non_empty(rt, Axis::Tangential)?;

    let mut out = crop(extended, [ra, rv, rt]);
    for a in ra.iter() {
        for v in rv.iter() {
            out[[a, v, rt.min]] += extended[[a, v, ext_rt.min]];
            out[[a, v, rt.max]] += extended[[a, v, ext_rt.max]];
        }
    }
    Ok(out)
}

/// Extend views, then tangential positions.
pub fn extend_boundaries(volume: &SampleVolume, mode: ViewExtension) -> Result<SampleVolume> {
    extend_tangential(&extend_views(volume, mode)?)
}

/// Transpose of [`extend_boundaries`].
pub fn transpose_extend_boundaries(extended: &SampleVolume, mode: ViewExtension) -> Result<SampleVolume> {
    transpose_extend_views(&transpose_extend_tangential(extended)?, mode)
}

/// Remove the padding added by [`extend_boundaries`] without folding it back.
pub fn crop_boundaries(extended: &SampleVolume) -> Result<SampleVolume> {
    let [ra, rv, rt] = extended.ranges();
    let (rv, rt) = (rv.shrink(1), rt.shrink(1));
    non_empty(rv, Axis::View)?;
    non_empty(rt, Axis::Tangential)?;
    Ok(crop(extended, [ra, rv, rt]))
}

fn crop(volume: &SampleVolume, ranges: [AxisRange; 3]) -> SampleVolume {
    SampleVolume::from_fn(ranges, |a, v, t| volume[[a, v, t]])
}

fn non_empty(range: AxisRange, axis: Axis) -> Result<()> {
    if range.is_empty() {
        return Err(ResampleError::EmptyRange(axis));
    }
    Ok(())
}

fn symmetric_tangential(range: AxisRange) -> Result<()> {
    if !range.is_symmetric() {
        return Err(ResampleError::unsupported_layout(format!(
            "periodic view extension needs a symmetric tangential range, got {}",
            range
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume() -> SampleVolume {
        SampleVolume::from_fn(
            [AxisRange::new(0, 1), AxisRange::new(2, 5), AxisRange::new(-2, 2)],
            |a, v, t| (a * 100 + v * 10 + t) as f32,
        )
    }

    #[test]
    fn test_extend_replicates_edges() {
        let vol = volume();
        let ext = extend_boundaries(&vol, ViewExtension::Replicate).unwrap();
        assert_eq!(ext.range(Axis::Axial), AxisRange::new(0, 1));
        assert_eq!(ext.range(Axis::View), AxisRange::new(1, 6));
        assert_eq!(ext.range(Axis::Tangential), AxisRange::new(-3, 3));

        assert_eq!(ext[[1, 1, 0]], vol[[1, 2, 0]]);
        assert_eq!(ext[[1, 6, 0]], vol[[1, 5, 0]]);
        assert_eq!(ext[[0, 3, -3]], vol[[0, 3, -2]]);
        assert_eq!(ext[[0, 3, 3]], vol[[0, 3, 2]]);
        // corners take both replications
        assert_eq!(ext[[0, 1, -3]], vol[[0, 2, -2]]);
        assert_eq!(ext[[0, 4, 1]], vol[[0, 4, 1]]);
    }

    #[test]
    fn test_periodic_view_extension_mirrors_tangential() {
        let vol = volume();
        let ext = extend_views(&vol, ViewExtension::Periodic).unwrap();
        assert_eq!(ext[[0, 1, 2]], vol[[0, 5, -2]]);
        assert_eq!(ext[[0, 6, -1]], vol[[0, 2, 1]]);

        let asym = SampleVolume::zeros([AxisRange::new(0, 0), AxisRange::new(0, 3), AxisRange::new(-2, 3)]);
        assert!(matches!(
            extend_views(&asym, ViewExtension::Periodic),
            Err(ResampleError::UnsupportedLayout(_))
        ));
    }

    #[test]
    fn test_crop_undoes_extension() {
        let vol = volume();
        let ext = extend_boundaries(&vol, ViewExtension::Replicate).unwrap();
        assert_eq!(crop_boundaries(&ext).unwrap(), vol);
    }

    #[test]
    fn test_transpose_sums_padding_onto_edges() {
        let ranges = [AxisRange::new(0, 0), AxisRange::new(0, 2), AxisRange::new(-1, 1)];
        let ext = SampleVolume::filled(
            [ranges[0], ranges[1].grow(1), ranges[2].grow(1)],
            1.0,
        );
        let out = transpose_extend_boundaries(&ext, ViewExtension::Replicate).unwrap();
        assert_eq!(out.ranges(), ranges);
        assert_eq!(out[[0, 1, 0]], 1.0);
        assert_eq!(out[[0, 0, 0]], 2.0);
        assert_eq!(out[[0, 1, 1]], 2.0);
        // corner collects its own value, two edge paddings and the padding corner
        assert_eq!(out[[0, 0, -1]], 4.0);
    }

    #[test]
    fn test_transpose_is_adjoint() {
        let x = volume();
        for mode in [ViewExtension::Replicate, ViewExtension::Periodic] {
            let ext_x = extend_boundaries(&x, mode).unwrap();
            let y = SampleVolume::from_fn(ext_x.ranges(), |a, v, t| ((a + 2 * v - t) as f32).sin());
            let lhs = ext_x.dot(&y).unwrap();
            let rhs = x.dot(&transpose_extend_boundaries(&y, mode).unwrap()).unwrap();
            assert!((lhs - rhs).abs() < 1e-6 * lhs.abs().max(1.0), "{mode:?}: {lhs} vs {rhs}");
        }
    }

    #[test]
    fn test_empty_axis_is_rejected() {
        let empty = SampleVolume::zeros([AxisRange::new(0, 1), AxisRange::new(0, -1), AxisRange::new(0, 1)]);
        assert!(matches!(
            extend_views(&empty, ViewExtension::Replicate),
            Err(ResampleError::EmptyRange(Axis::View))
        ));
    }
}
