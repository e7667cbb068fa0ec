//! Spline coefficients on a regular 3D grid with pull and push evaluation.

use rayon::prelude::*;
use sinogram_common::{Axis, AxisRange, SampleVolume};

use super::kernel::{SplineTypes, Taps};
use super::prefilter::{apply_along_axis, cubic_fit_line, cubic_fit_line_transposed};
use super::SUPPORT_EPSILON;
use crate::error::{ResampleError, Result};
use crate::mapping::AffineMap;

/// Spline coefficients covering a rectangular index range.
#[derive(Debug, Clone)]
pub struct RegularGridSpline {
    kinds: SplineTypes,
    ranges: [AxisRange; 3],
    coefficients: Vec<f64>,
}

impl RegularGridSpline {
    /// Fit coefficients so that the spline interpolates `volume` at its nodes.
    pub fn fit(volume: &SampleVolume, kinds: SplineTypes) -> Result<Self> {
        let mut spline = Self::zeros(volume.ranges(), kinds)?;
        spline
            .coefficients
            .iter_mut()
            .zip(volume.data())
            .for_each(|(c, &v)| *c = v as f64);

        let shape = volume.shape();
        for axis in 0..3 {
            if kinds[axis].needs_prefilter() {
                apply_along_axis(&mut spline.coefficients, shape, axis, cubic_fit_line);
            }
        }
        Ok(spline)
    }

    /// Zero coefficients over `ranges`, ready to accumulate pushed values.
    pub fn zeros(ranges: [AxisRange; 3], kinds: SplineTypes) -> Result<Self> {
        for axis in Axis::ALL {
            if ranges[axis.index()].is_empty() {
                return Err(ResampleError::EmptyRange(axis));
            }
        }
        let len = ranges.iter().map(AxisRange::len).product();
        Ok(Self {
            kinds,
            ranges,
            coefficients: vec![0.0; len],
        })
    }

    pub fn kinds(&self) -> SplineTypes {
        self.kinds
    }

    pub fn ranges(&self) -> [AxisRange; 3] {
        self.ranges
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate at a continuous index position, `None` outside the support.
    pub fn evaluate(&self, position: [f64; 3]) -> Option<f64> {
        let a = self.taps(0, position[0])?;
        let v = self.taps(1, position[1])?;
        let t = self.taps(2, position[2])?;
        Some(self.gather(&a, &v, &t))
    }

    /// Fill `out` by evaluating the spline at `map` applied to each index.
    ///
    /// Cells whose position falls outside the support keep their value.
    pub fn pull(&self, out: &mut SampleVolume, map: &AffineMap, parallel: bool) {
        let [ra, rv, rt] = out.ranges();
        let axial = self.axis_taps(0, ra, map);
        let views = self.axis_taps(1, rv, map);
        let tangential = self.axis_taps(2, rt, map);
        let plane_len = out.plane_len();
        let nt = rt.len();
        if plane_len == 0 {
            return;
        }

        let fill_plane = |(a, plane): (usize, &mut [f32])| {
            let Some(ta) = &axial[a] else { return };
            for (v, tv) in views.iter().enumerate() {
                let Some(tv) = tv else { continue };
                for (t, tt) in tangential.iter().enumerate() {
                    if let Some(tt) = tt {
                        plane[v * nt + t] = self.gather(ta, tv, tt) as f32;
                    }
                }
            }
        };

        if parallel {
            out.data_mut()
                .par_chunks_mut(plane_len)
                .enumerate()
                .for_each(fill_plane);
        } else {
            out.data_mut()
                .chunks_mut(plane_len)
                .enumerate()
                .for_each(fill_plane);
        }
    }

    /// Scatter-add `input` into the coefficients: the transpose of
    /// [`pull`](Self::pull) for the same `map`.
    pub fn push(&mut self, input: &SampleVolume, map: &AffineMap, parallel: bool) {
        let [ra, rv, rt] = input.ranges();
        let axial = self.axis_taps(0, ra, map);
        let views = self.axis_taps(1, rv, map);
        let tangential = self.axis_taps(2, rt, map);
        let plane_len = input.plane_len();
        let len = self.coefficients.len();
        if plane_len == 0 {
            return;
        }

        let scatter_plane = |mut acc: Vec<f64>, (a, plane): (usize, &[f32])| {
            if let Some(ta) = &axial[a] {
                self.scatter(&mut acc, ta, &views, &tangential, plane, rt.len());
            }
            acc
        };

        let accumulated = if parallel {
            input
                .data()
                .par_chunks(plane_len)
                .enumerate()
                .fold(|| vec![0.0; len], scatter_plane)
                .reduce(|| vec![0.0; len], merge)
        } else {
            input
                .data()
                .chunks(plane_len)
                .enumerate()
                .fold(vec![0.0; len], scatter_plane)
        };

        merge_into(&mut self.coefficients, &accumulated);
    }

    /// Apply the transposed fit and return the coefficients as samples.
    pub fn into_transposed_samples(mut self) -> SampleVolume {
        let shape = [
            self.ranges[0].len(),
            self.ranges[1].len(),
            self.ranges[2].len(),
        ];
        for axis in (0..3).rev() {
            if self.kinds[axis].needs_prefilter() {
                apply_along_axis(&mut self.coefficients, shape, axis, cubic_fit_line_transposed);
            }
        }
        // from_fn visits cells in storage order
        let mut values = self.coefficients.iter();
        SampleVolume::from_fn(self.ranges, |_, _, _| {
            values.next().map_or(0.0, |&c| c as f32)
        })
    }

    /// Taps for a position along `axis`, `None` outside the support.
    fn taps(&self, axis: usize, position: f64) -> Option<Taps> {
        let range = self.ranges[axis];
        let supported = position >= range.min as f64 - SUPPORT_EPSILON
            && position <= range.max as f64 + SUPPORT_EPSILON;
        supported.then(|| self.kinds[axis].taps(position, range))
    }

    /// Taps for every index of `range` under `map`.
    fn axis_taps(&self, axis: usize, range: AxisRange, map: &AffineMap) -> Vec<Option<Taps>> {
        range
            .iter()
            .map(|index| self.taps(axis, map.coordinate(axis, index)))
            .collect()
    }

    #[inline]
    fn strides(&self) -> (usize, usize) {
        let nt = self.ranges[2].len();
        (self.ranges[1].len() * nt, nt)
    }

    fn gather(&self, ta: &Taps, tv: &Taps, tt: &Taps) -> f64 {
        let (plane, row) = self.strides();
        let mut sum = 0.0;
        for (na, wa) in ta.iter() {
            for (nv, wv) in tv.iter() {
                let base = na * plane + nv * row;
                let inner: f64 = tt.iter().map(|(nt, wt)| wt * self.coefficients[base + nt]).sum();
                sum += wa * wv * inner;
            }
        }
        sum
    }

    fn scatter(
        &self,
        acc: &mut [f64],
        ta: &Taps,
        views: &[Option<Taps>],
        tangential: &[Option<Taps>],
        plane: &[f32],
        nt_in: usize,
    ) {
        let (plane_stride, row) = self.strides();
        for (v, tv) in views.iter().enumerate() {
            let Some(tv) = tv else { continue };
            for (t, tt) in tangential.iter().enumerate() {
                let Some(tt) = tt else { continue };
                let value = plane[v * nt_in + t] as f64;
                if value == 0.0 {
                    continue;
                }
                for (na, wa) in ta.iter() {
                    for (nv, wv) in tv.iter() {
                        let base = na * plane_stride + nv * row;
                        let w = value * wa * wv;
                        for (nt, wt) in tt.iter() {
                            acc[base + nt] += w * wt;
                        }
                    }
                }
            }
        }
    }
}

fn merge(mut a: Vec<f64>, b: Vec<f64>) -> Vec<f64> {
    merge_into(&mut a, &b);
    a
}

fn merge_into(target: &mut [f64], other: &[f64]) {
    target.iter_mut().zip(other).for_each(|(t, o)| *t += o);
}
