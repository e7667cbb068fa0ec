//! One-dimensional spline basis functions.

use serde::{Deserialize, Serialize};
use sinogram_common::{Axis, AxisRange};
use std::ops::Index;

/// Spline used along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplineKind {
    /// Order 0: value of the nearest sample.
    Nearest,
    /// Order 1: linear interpolation between the two neighbouring samples.
    #[default]
    Linear,
    /// Order 3: interpolating cubic B-spline with mirror boundaries.
    Cubic,
}

impl SplineKind {
    /// Polynomial order of the basis.
    pub fn order(self) -> usize {
        match self {
            SplineKind::Nearest => 0,
            SplineKind::Linear => 1,
            SplineKind::Cubic => 3,
        }
    }

    /// Whether coefficients differ from samples and need a prefilter.
    pub fn needs_prefilter(self) -> bool {
        matches!(self, SplineKind::Cubic)
    }

    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "nearest" | "0" => Self::Nearest,
            "cubic" | "bspline" | "3" => Self::Cubic,
            _ => Self::Linear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SplineKind::Nearest => "nearest",
            SplineKind::Linear => "linear",
            SplineKind::Cubic => "cubic",
        }
    }

    /// Coefficient nodes and weights contributing to `position`.
    ///
    /// `position` is an absolute index along an axis whose coefficients
    /// cover `range`. Nodes are returned as offsets from `range.min`. Nodes
    /// outside the range are clamped (nearest, linear) or mirrored (cubic).
    pub(crate) fn taps(self, position: f64, range: AxisRange) -> Taps {
        let len = range.len();
        let local = position - range.min as f64;
        let mut taps = Taps::default();

        match self {
            SplineKind::Nearest => {
                let node = (local + 0.5).floor() as i64;
                taps.push(clamp(node, len), 1.0);
            }
            SplineKind::Linear => {
                let base = local.floor();
                let frac = local - base;
                let base = base as i64;
                taps.push(clamp(base, len), 1.0 - frac);
                taps.push(clamp(base + 1, len), frac);
            }
            SplineKind::Cubic => {
                let base = local.floor();
                let t = local - base;
                let base = base as i64;
                let t2 = t * t;
                let t3 = t2 * t;
                let weights = [
                    (1.0 - t).powi(3) / 6.0,
                    (4.0 - 6.0 * t2 + 3.0 * t3) / 6.0,
                    (1.0 + 3.0 * t + 3.0 * t2 - 3.0 * t3) / 6.0,
                    t3 / 6.0,
                ];
                for (k, w) in weights.into_iter().enumerate() {
                    taps.push(reflect(base - 1 + k as i64, len), w);
                }
            }
        }

        taps
    }
}

impl std::fmt::Display for SplineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spline kinds for the axial, view and tangential axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplineTypes(pub [SplineKind; 3]);

impl SplineTypes {
    pub fn new(axial: SplineKind, view: SplineKind, tangential: SplineKind) -> Self {
        Self([axial, view, tangential])
    }

    /// The same kind on every axis.
    pub fn uniform(kind: SplineKind) -> Self {
        Self([kind; 3])
    }

    pub fn axis(&self, axis: Axis) -> SplineKind {
        self.0[axis.index()]
    }

    /// Parse either a single kind (`"cubic"`) or three comma-separated kinds
    /// (`"linear,cubic,cubic"`).
    pub fn from_str(s: &str) -> Self {
        let parts: Vec<SplineKind> = s.split(',').map(SplineKind::from_str).collect();
        match parts.as_slice() {
            [a, v, t] => Self::new(*a, *v, *t),
            [kind] => Self::uniform(*kind),
            _ => Self::default(),
        }
    }
}

impl Index<usize> for SplineTypes {
    type Output = SplineKind;

    fn index(&self, axis: usize) -> &SplineKind {
        &self.0[axis]
    }
}

impl std::fmt::Display for SplineTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Up to four (node, weight) pairs along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Taps {
    nodes: [usize; 4],
    weights: [f64; 4],
    len: usize,
}

impl Taps {
    fn push(&mut self, node: usize, weight: f64) {
        self.nodes[self.len] = node;
        self.weights[self.len] = weight;
        self.len += 1;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.nodes[..self.len]
            .iter()
            .copied()
            .zip(self.weights[..self.len].iter().copied())
    }
}

#[inline]
fn clamp(node: i64, len: usize) -> usize {
    node.clamp(0, len as i64 - 1) as usize
}

/// Mirror `node` into `[0, len)` with whole-sample symmetry.
#[inline]
pub(crate) fn reflect(node: i64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as i64 - 1);
    let m = node.rem_euclid(period);
    if m >= len as i64 {
        (period - m) as usize
    } else {
        m as usize
    }
}
