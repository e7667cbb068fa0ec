//! Logical projection-data coordinates.

use serde::{Deserialize, Serialize};

/// One of the three sample axes of a segment, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Axial position (physical coordinate `m`).
    Axial,
    /// Angular view (physical coordinate `phi`).
    View,
    /// Tangential position (physical coordinate `s`).
    Tangential,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::Axial, Axis::View, Axis::Tangential];

    /// Position of this axis in storage order.
    pub fn index(self) -> usize {
        match self {
            Axis::Axial => 0,
            Axis::View => 1,
            Axis::Tangential => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Axial => "axial",
            Axis::View => "view",
            Axis::Tangential => "tangential",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A bin in projection space: segment, view, axial and tangential position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bin {
    pub segment: i32,
    pub view: i32,
    pub axial_pos: i32,
    pub tangential_pos: i32,
}

impl Bin {
    /// Create a new bin.
    pub fn new(segment: i32, view: i32, axial_pos: i32, tangential_pos: i32) -> Self {
        Self {
            segment,
            view,
            axial_pos,
            tangential_pos,
        }
    }

    /// The bin used as the common reference for all axis relations.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Copy of this bin at another view.
    pub fn with_view(self, view: i32) -> Self {
        Self { view, ..self }
    }
}
