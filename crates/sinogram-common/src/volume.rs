//! Rectangular blocks of sinogram samples with arbitrary integer index ranges.

use crate::bin::Axis;
use crate::error::{ProjDataError, ProjDataResult};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, RangeInclusive};

/// Inclusive integer index range along one axis. Empty when `max < min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    /// Create a new range `[min, max]`.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range of `len` indices starting at `min`.
    pub fn with_len(min: i32, len: usize) -> Self {
        Self {
            min,
            max: min + len as i32 - 1,
        }
    }

    /// Range `[-half, half]`, the usual tangential layout.
    pub fn symmetric(half: i32) -> Self {
        Self::new(-half, half)
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        if self.max < self.min {
            0
        } else {
            (self.max - self.min + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    pub fn contains(&self, index: i32) -> bool {
        index >= self.min && index <= self.max
    }

    /// Whether `index` and `-index` are both in range for every index.
    pub fn is_symmetric(&self) -> bool {
        self.min == -self.max
    }

    /// Range grown by `by` indices at each end.
    pub fn grow(&self, by: i32) -> Self {
        Self::new(self.min - by, self.max + by)
    }

    /// Range shrunk by `by` indices at each end.
    pub fn shrink(&self, by: i32) -> Self {
        Self::new(self.min + by, self.max - by)
    }

    pub fn iter(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }
}

impl std::fmt::Display for AxisRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A 2D sinogram (view × tangential) at a single axial position.
#[derive(Debug, Clone, PartialEq)]
pub struct Sinogram {
    views: AxisRange,
    tangential: AxisRange,
    data: Vec<f32>,
}

impl Sinogram {
    /// Create a zero-filled sinogram.
    pub fn zeros(views: AxisRange, tangential: AxisRange) -> Self {
        Self {
            views,
            tangential,
            data: vec![0.0; views.len() * tangential.len()],
        }
    }

    /// Create a sinogram by evaluating `f(view, tangential)` at every cell.
    pub fn from_fn(views: AxisRange, tangential: AxisRange, mut f: impl FnMut(i32, i32) -> f32) -> Self {
        let mut data = Vec::with_capacity(views.len() * tangential.len());
        for v in views.iter() {
            for t in tangential.iter() {
                data.push(f(v, t));
            }
        }
        Self {
            views,
            tangential,
            data,
        }
    }

    pub fn views(&self) -> AxisRange {
        self.views
    }

    pub fn tangential(&self) -> AxisRange {
        self.tangential
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get the value at `(view, tangential)`.
    pub fn get(&self, view: i32, tangential: i32) -> Option<f32> {
        self.flat_index(view, tangential).map(|i| self.data[i])
    }

    fn flat_index(&self, view: i32, tangential: i32) -> Option<usize> {
        if !self.views.contains(view) || !self.tangential.contains(tangential) {
            return None;
        }
        let v = (view - self.views.min) as usize;
        let t = (tangential - self.tangential.min) as usize;
        Some(v * self.tangential.len() + t)
    }
}

impl Index<[i32; 2]> for Sinogram {
    type Output = f32;

    fn index(&self, [view, tangential]: [i32; 2]) -> &f32 {
        let i = self
            .flat_index(view, tangential)
            .unwrap_or_else(|| panic!("sinogram index ({view}, {tangential}) out of range"));
        &self.data[i]
    }
}

impl IndexMut<[i32; 2]> for Sinogram {
    fn index_mut(&mut self, [view, tangential]: [i32; 2]) -> &mut f32 {
        let i = self
            .flat_index(view, tangential)
            .unwrap_or_else(|| panic!("sinogram index ({view}, {tangential}) out of range"));
        &mut self.data[i]
    }
}

/// A rectangular 3-axis sample volume (axial × view × tangential).
///
/// Storage is row-major with the tangential axis innermost. Index ranges are
/// inclusive and need not start at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleVolume {
    ranges: [AxisRange; 3],
    data: Vec<f32>,
}

impl SampleVolume {
    /// Create a zero-filled volume.
    pub fn zeros(ranges: [AxisRange; 3]) -> Self {
        Self::filled(ranges, 0.0)
    }

    /// Create a volume with every sample set to `value`.
    pub fn filled(ranges: [AxisRange; 3], value: f32) -> Self {
        let len = ranges.iter().map(AxisRange::len).product();
        Self {
            ranges,
            data: vec![value; len],
        }
    }

    /// Wrap existing row-major data.
    pub fn from_vec(ranges: [AxisRange; 3], data: Vec<f32>) -> ProjDataResult<Self> {
        let expected: usize = ranges.iter().map(AxisRange::len).product();
        if data.len() != expected {
            return Err(ProjDataError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { ranges, data })
    }

    /// Create a volume by evaluating `f(axial, view, tangential)` at every cell.
    pub fn from_fn(ranges: [AxisRange; 3], mut f: impl FnMut(i32, i32, i32) -> f32) -> Self {
        let mut data = Vec::with_capacity(ranges.iter().map(AxisRange::len).product());
        for a in ranges[0].iter() {
            for v in ranges[1].iter() {
                for t in ranges[2].iter() {
                    data.push(f(a, v, t));
                }
            }
        }
        Self { ranges, data }
    }

    /// Assemble a segment from per-axial-position sinograms.
    ///
    /// All sinograms must share the same view and tangential ranges.
    pub fn from_sinograms(axial_min: i32, sinograms: Vec<Sinogram>) -> ProjDataResult<Self> {
        let first = sinograms.first().ok_or(ProjDataError::EmptyRange("axial"))?;
        let (views, tangential) = (first.views, first.tangential);

        let mut data = Vec::with_capacity(sinograms.len() * views.len() * tangential.len());
        for (offset, sinogram) in sinograms.iter().enumerate() {
            if sinogram.views != views || sinogram.tangential != tangential {
                return Err(ProjDataError::irregular(format!(
                    "sinogram at axial position {} has ranges {} x {}, expected {} x {}",
                    axial_min + offset as i32,
                    sinogram.views,
                    sinogram.tangential,
                    views,
                    tangential
                )));
            }
            data.extend_from_slice(&sinogram.data);
        }

        Ok(Self {
            ranges: [AxisRange::with_len(axial_min, sinograms.len()), views, tangential],
            data,
        })
    }

    pub fn ranges(&self) -> [AxisRange; 3] {
        self.ranges
    }

    pub fn range(&self, axis: Axis) -> AxisRange {
        self.ranges[axis.index()]
    }

    /// Number of samples along each axis.
    pub fn shape(&self) -> [usize; 3] {
        [self.ranges[0].len(), self.ranges[1].len(), self.ranges[2].len()]
    }

    /// Number of samples in one axial plane.
    pub fn plane_len(&self) -> usize {
        self.ranges[1].len() * self.ranges[2].len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Row-major position of `(axial, view, tangential)`, if in range.
    pub fn flat_index(&self, axial: i32, view: i32, tangential: i32) -> Option<usize> {
        let [ra, rv, rt] = &self.ranges;
        if !ra.contains(axial) || !rv.contains(view) || !rt.contains(tangential) {
            return None;
        }
        let a = (axial - ra.min) as usize;
        let v = (view - rv.min) as usize;
        let t = (tangential - rt.min) as usize;
        Some((a * rv.len() + v) * rt.len() + t)
    }

    /// Get the value at `(axial, view, tangential)`.
    pub fn get(&self, axial: i32, view: i32, tangential: i32) -> Option<f32> {
        self.flat_index(axial, view, tangential).map(|i| self.data[i])
    }

    /// Copy out the sinogram at one axial position.
    pub fn sinogram(&self, axial: i32) -> Option<Sinogram> {
        if !self.ranges[0].contains(axial) {
            return None;
        }
        let start = (axial - self.ranges[0].min) as usize * self.plane_len();
        Some(Sinogram {
            views: self.ranges[1],
            tangential: self.ranges[2],
            data: self.data[start..start + self.plane_len()].to_vec(),
        })
    }

    /// Whether both volumes cover exactly the same index ranges.
    pub fn same_ranges(&self, other: &SampleVolume) -> bool {
        self.ranges == other.ranges
    }

    /// Human-readable description of the index ranges.
    pub fn describe(&self) -> String {
        format!(
            "axial {} x view {} x tangential {}",
            self.ranges[0], self.ranges[1], self.ranges[2]
        )
    }

    /// Multiply every sample by `factor`.
    pub fn scale(&mut self, factor: f32) {
        self.data.iter_mut().for_each(|v| *v *= factor);
    }

    pub fn min(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }

    pub fn max(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    /// Sum of all samples, accumulated in f64.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Inner product with a volume of identical ranges, accumulated in f64.
    pub fn dot(&self, other: &SampleVolume) -> ProjDataResult<f64> {
        if !self.same_ranges(other) {
            return Err(ProjDataError::shape_mismatch(self.describe(), other.describe()));
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum())
    }
}

impl Index<[i32; 3]> for SampleVolume {
    type Output = f32;

    fn index(&self, [a, v, t]: [i32; 3]) -> &f32 {
        let i = self
            .flat_index(a, v, t)
            .unwrap_or_else(|| panic!("volume index ({a}, {v}, {t}) out of range"));
        &self.data[i]
    }
}

impl IndexMut<[i32; 3]> for SampleVolume {
    fn index_mut(&mut self, [a, v, t]: [i32; 3]) -> &mut f32 {
        let i = self
            .flat_index(a, v, t)
            .unwrap_or_else(|| panic!("volume index ({a}, {v}, {t}) out of range"));
        &mut self.data[i]
    }
}
