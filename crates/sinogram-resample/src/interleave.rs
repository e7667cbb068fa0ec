//! Removal and restoration of angular interleaving.
//!
//! In non-arc-corrected cylindrical data, neighbouring views sample
//! tangential positions shifted by half a bin. Doubling the view axis puts
//! every sample on a common grid: cells whose `view + tangential` is even
//! are copied from the input, the others are averaged from four neighbours.
//! Views beyond 180 degrees wrap to the start with the tangential index
//! mirrored, so the tangential range must be symmetric.

use rayon::prelude::*;
use sinogram_common::{
    AxisRange, GeometryFamily, ProjDataError, ProjDataGeometry, SampleVolume, SegmentShape,
};

use crate::error::{ResampleError, Result};

/// Shape of `segment` with its view count doubled.
pub fn non_interleaved_shape(geometry: &dyn ProjDataGeometry, segment: i32) -> Result<SegmentShape> {
    let shape = segment_shape(geometry, segment)?;
    Ok(shape.with_num_views(shape.views.len() * 2))
}

/// Shape of `segment` with its view count halved.
pub fn interleaved_shape(geometry: &dyn ProjDataGeometry, segment: i32) -> Result<SegmentShape> {
    let shape = segment_shape(geometry, segment)?;
    let views = shape.views.len();
    if views % 2 != 0 {
        return Err(ResampleError::unsupported_layout(format!(
            "cannot halve an odd view count ({views})"
        )));
    }
    Ok(shape.with_num_views(views / 2))
}

fn segment_shape(geometry: &dyn ProjDataGeometry, segment: i32) -> Result<SegmentShape> {
    check_family(geometry.family())?;
    geometry
        .segment_shape(segment)
        .ok_or(ResampleError::ProjData(ProjDataError::SegmentNotFound(segment)))
}

/// Double the view axis of `volume`.
///
/// The first and last tangential positions of the result are left at zero.
pub fn remove_interleaving(volume: &SampleVolume, family: GeometryFamily) -> Result<SampleVolume> {
    let n = check_layout(volume.ranges(), family)?;
    let [ra, _, rt] = volume.ranges();
    let doubled = AxisRange::with_len(0, 2 * n as usize);

    Ok(SampleVolume::from_fn([ra, doubled, rt], |a, v, t| {
        if t == rt.min || t == rt.max {
            return 0.0;
        }
        let stencil = Stencil::at(v, t, n);
        stencil.cells().map(|&(sv, st)| volume[[a, sv, st]]).sum::<f32>() * stencil.weight
    }))
}

/// Transpose of [`remove_interleaving`]: halve the view axis, routing every
/// cell back to the inputs it was computed from with the same weights.
pub fn transpose_remove_interleaving(
    doubled: &SampleVolume,
    family: GeometryFamily,
) -> Result<SampleVolume> {
    let [ra, rv, rt] = doubled.ranges();
    let n = halved_views(rv)?;
    check_layout([ra, AxisRange::with_len(0, n as usize), rt], family)?;

    let mut out = SampleVolume::zeros([ra, AxisRange::with_len(0, n as usize), rt]);
    let nt = rt.len();
    let plane_len = out.plane_len();
    if plane_len == 0 {
        return Ok(out);
    }

    out.data_mut()
        .par_chunks_mut(plane_len)
        .enumerate()
        .for_each(|(i, plane)| {
            let a = ra.min + i as i32;
            for v in rv.iter() {
                for t in (rt.min + 1)..rt.max {
                    let value = doubled[[a, v, t]];
                    let stencil = Stencil::at(v, t, n);
                    for &(sv, st) in stencil.cells() {
                        plane[sv as usize * nt + (st - rt.min) as usize] += value * stencil.weight;
                    }
                }
            }
        });
    Ok(out)
}

/// Halve the view axis by copying the directly copied cells back.
///
/// Averaged cells are ignored, so this inverts [`remove_interleaving`] on
/// the interior but is not its transpose.
pub fn restore_interleaving(doubled: &SampleVolume, family: GeometryFamily) -> Result<SampleVolume> {
    let [ra, rv, rt] = doubled.ranges();
    let n = halved_views(rv)?;
    let ranges = [ra, AxisRange::with_len(0, n as usize), rt];
    check_layout(ranges, family)?;

    let mut out = SampleVolume::zeros(ranges);
    for a in ra.iter() {
        for v in rv.iter() {
            for t in rt.iter() {
                if (v + t).rem_euclid(2) == 0 {
                    let (sv, st) = wrap(copied_view(v), t, n);
                    out[[a, sv, st]] = doubled[[a, v, t]];
                }
            }
        }
    }
    Ok(out)
}

fn check_family(family: GeometryFamily) -> Result<()> {
    if !family.supports_interleaving() {
        return Err(ResampleError::unsupported_geometry(format!(
            "interleaving can only be removed from non-arc-corrected cylindrical data, got {family}"
        )));
    }
    Ok(())
}

/// Validate an interleaved layout and return its view count.
fn check_layout(ranges: [AxisRange; 3], family: GeometryFamily) -> Result<i32> {
    check_family(family)?;
    let [_, views, tangential] = ranges;
    if views.is_empty() || views.min != 0 {
        return Err(ResampleError::unsupported_layout(format!(
            "views must start at 0, got {views}"
        )));
    }
    if tangential.is_empty() || !tangential.is_symmetric() {
        return Err(ResampleError::unsupported_layout(format!(
            "tangential range must be symmetric, got {tangential}"
        )));
    }
    Ok(views.len() as i32)
}

fn halved_views(views: AxisRange) -> Result<i32> {
    let len = views.len();
    if len == 0 || len % 2 != 0 || views.min != 0 {
        return Err(ResampleError::unsupported_layout(format!(
            "expected an even number of views starting at 0, got {views}"
        )));
    }
    Ok(len as i32 / 2)
}

/// Input view a directly copied cell of doubled view `view` comes from.
#[inline]
fn copied_view(view: i32) -> i32 {
    if view % 2 == 0 {
        view / 2
    } else {
        (view + 1) / 2
    }
}

/// Views past the last one wrap to the start with the tangential index mirrored.
#[inline]
fn wrap(view: i32, tangential: i32, n: i32) -> (i32, i32) {
    if view >= n {
        (view - n, -tangential)
    } else {
        (view, tangential)
    }
}

/// Input cells combined into one doubled cell, with their common weight.
struct Stencil {
    cells: [(i32, i32); 4],
    len: usize,
    weight: f32,
}

impl Stencil {
    fn at(view: i32, t: i32, n: i32) -> Self {
        if (view + t).rem_euclid(2) == 0 {
            let (v, t) = wrap(copied_view(view), t, n);
            return Self {
                cells: [(v, t); 4],
                len: 1,
                weight: 1.0,
            };
        }
        let next = view / 2 + 1;
        let other = (view + 1) / 2;
        Self {
            cells: [
                (view / 2, t),
                wrap(next, t, n),
                wrap(other, t - 1, n),
                wrap(other, t + 1, n),
            ],
            len: 4,
            weight: 0.25,
        }
    }

    fn cells(&self) -> std::slice::Iter<'_, (i32, i32)> {
        self.cells[..self.len].iter()
    }
}
