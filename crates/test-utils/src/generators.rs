//! Sample volume generators for creating synthetic sinogram-like data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use sinogram_common::{AxisRange, SampleVolume};

/// Creates a volume whose values encode their own indices.
///
/// Each cell value is calculated as: `axial * 10000 + view * 100 + tangential`
///
/// This makes it easy to check which input cell ended up where.
///
/// # Example
///
/// ```
/// use sinogram_common::AxisRange;
/// use test_utils::index_volume;
///
/// let vol = index_volume([AxisRange::new(0, 1), AxisRange::new(0, 3), AxisRange::symmetric(2)]);
/// assert_eq!(vol[[1, 2, -1]], 10199.0);
/// ```
pub fn index_volume(ranges: [AxisRange; 3]) -> SampleVolume {
    SampleVolume::from_fn(ranges, |a, v, t| (a * 10000 + v * 100 + t) as f32)
}

/// Creates a smooth, strictly positive volume resembling a sinogram of a
/// centred blob: a Gaussian profile in the tangential direction with slow
/// variation over views and axial positions.
pub fn smooth_volume(ranges: [AxisRange; 3]) -> SampleVolume {
    let [ra, rv, rt] = ranges;
    let width = (rt.len().max(2) as f32) / 4.0;
    let views = rv.len().max(1) as f32;
    let planes = ra.len().max(1) as f32;
    SampleVolume::from_fn(ranges, |a, v, t| {
        let profile = (-(t as f32 / width).powi(2)).exp();
        let angular = 1.0 + 0.2 * (std::f32::consts::PI * v as f32 / views).cos();
        let axial = 1.0 + 0.1 * (a as f32 / planes);
        10.0 * profile * angular * axial + 0.5
    })
}

/// Creates a volume of pseudo-random values in `[-1, 1)`.
///
/// Uses a fixed linear congruential generator so results are identical
/// across runs and platforms.
pub fn random_volume(ranges: [AxisRange; 3], seed: u64) -> SampleVolume {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    SampleVolume::from_fn(ranges, |_, _, _| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
    })
}

/// Creates a volume that is zero except for a single cell.
pub fn impulse_volume(ranges: [AxisRange; 3], at: [i32; 3], value: f32) -> SampleVolume {
    let mut vol = SampleVolume::zeros(ranges);
    vol[at] = value;
    vol
}
