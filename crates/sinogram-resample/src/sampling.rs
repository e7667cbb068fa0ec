//! Resampling of whole volumes on regular grids.

use rayon::prelude::*;
use sinogram_common::SampleVolume;
use tracing::debug;

use crate::error::Result;
use crate::mapping::AffineMap;
use crate::spline::{RegularGridSpline, SplineTypes};

/// Fill `out` with `f` evaluated at the source position of every cell.
pub fn sample_function_on_regular_grid<F>(out: &mut SampleVolume, f: F, map: &AffineMap)
where
    F: Fn([f64; 3]) -> f32 + Sync,
{
    let [ra, rv, rt] = out.ranges();
    let plane_len = out.plane_len();
    if plane_len == 0 {
        return;
    }
    let nt = rt.len();

    out.data_mut()
        .par_chunks_mut(plane_len)
        .enumerate()
        .for_each(|(i, plane)| {
            let pa = map.coordinate(0, ra.min + i as i32);
            for (iv, v) in rv.iter().enumerate() {
                let pv = map.coordinate(1, v);
                for (it, t) in rt.iter().enumerate() {
                    plane[iv * nt + it] = f([pa, pv, map.coordinate(2, t)]);
                }
            }
        });
}

/// Fit a spline to `input` and evaluate it at every cell of `out`.
///
/// Cells mapped outside the support of `input` are left untouched.
pub fn sample_on_regular_grid_pull(
    out: &mut SampleVolume,
    input: &SampleVolume,
    kinds: SplineTypes,
    map: &AffineMap,
    parallel: bool,
) -> Result<()> {
    let spline = RegularGridSpline::fit(input, kinds)?;
    spline.pull(out, map, parallel);
    Ok(())
}

/// Adjoint of [`sample_on_regular_grid_pull`] for the same `map`.
///
/// `input` has the ranges of the pull output, `out` those of the pull
/// input. The result is scaled by the product of the steps, so that
/// `<push(x), y> = prod(step) * <x, pull(y)>`. Existing values of `out`
/// are overwritten.
pub fn sample_on_regular_grid_push(
    out: &mut SampleVolume,
    input: &SampleVolume,
    kinds: SplineTypes,
    map: &AffineMap,
    parallel: bool,
) -> Result<()> {
    let mut spline = RegularGridSpline::zeros(out.ranges(), kinds)?;
    spline.push(input, map, parallel);

    let mut pushed = spline.into_transposed_samples();
    let scale = map.volume_scale();
    pushed.scale(scale as f32);
    debug!(
        scale,
        sum = pushed.sum(),
        "Pushed {} onto {}",
        input.describe(),
        pushed.describe()
    );

    *out = pushed;
    Ok(())
}
