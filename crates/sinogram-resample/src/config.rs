//! Configuration for sinogram resampling.

use crate::error::Result;
use crate::mapping::MappingOptions;
use crate::spline::{SplineKind, SplineTypes};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the view axis is padded before interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewExtension {
    /// Copy the first/last view (zero-order replication).
    #[default]
    Replicate,
    /// Wrap around using the 180 degree symmetry of the sinogram
    /// (tangential position is mirrored). Needs a symmetric tangential range.
    Periodic,
}

impl ViewExtension {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "periodic" | "wrap" => Self::Periodic,
            _ => Self::Replicate,
        }
    }
}

/// Which reverse transform push uses after removing interleaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterleaveAdjoint {
    /// Transpose of the forward transform, including the averaged cells.
    #[default]
    Exact,
    /// Route only the directly copied cells back; averaged cells are dropped.
    DirectCopy,
}

impl InterleaveAdjoint {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "direct_copy" | "direct-copy" | "copy" => Self::DirectCopy,
            _ => Self::Exact,
        }
    }
}

/// Per-call configuration of the resampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Spline kind per axis (axial, view, tangential).
    pub spline: SplineTypes,

    /// Remove interleaving of non-arc-corrected data before interpolating.
    pub remove_interleaving: bool,

    /// Add each scanner's intrinsic tilt to its reference angle. Experimental.
    pub use_view_offset: bool,

    pub view_extension: ViewExtension,

    pub interleave_adjoint: InterleaveAdjoint,

    /// Spread work over the rayon thread pool.
    pub parallel: bool,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            spline: SplineTypes::uniform(SplineKind::Linear),
            remove_interleaving: false,
            use_view_offset: false,
            view_extension: ViewExtension::Replicate,
            interleave_adjoint: InterleaveAdjoint::Exact,
            parallel: true,
        }
    }
}

impl ResampleConfig {
    /// Configuration using one spline kind on every axis.
    pub fn with_spline(kind: SplineKind) -> Self {
        Self {
            spline: SplineTypes::uniform(kind),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SINO_SPLINE") {
            config.spline = SplineTypes::from_str(&val);
        }

        if let Ok(val) = std::env::var("SINO_REMOVE_INTERLEAVING") {
            config.remove_interleaving = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("SINO_USE_VIEW_OFFSET") {
            config.use_view_offset = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("SINO_VIEW_EXTENSION") {
            config.view_extension = ViewExtension::from_str(&val);
        }

        if let Ok(val) = std::env::var("SINO_INTERLEAVE_ADJOINT") {
            config.interleave_adjoint = InterleaveAdjoint::from_str(&val);
        }

        if let Ok(val) = std::env::var("SINO_PARALLEL") {
            config.parallel = parse_flag(&val);
        }

        config
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Options for deriving the affine map between geometries.
    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            remove_interleaving: self.remove_interleaving,
            use_view_offset: self.use_view_offset,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResampleConfig::default();
        assert_eq!(config.spline, SplineTypes::uniform(SplineKind::Linear));
        assert!(!config.remove_interleaving);
        assert!(!config.use_view_offset);
        assert_eq!(config.view_extension, ViewExtension::Replicate);
        assert_eq!(config.interleave_adjoint, InterleaveAdjoint::Exact);
        assert!(config.parallel);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(ViewExtension::from_str("PERIODIC"), ViewExtension::Periodic);
        assert_eq!(ViewExtension::from_str("bogus"), ViewExtension::Replicate);
        assert_eq!(
            InterleaveAdjoint::from_str("direct_copy"),
            InterleaveAdjoint::DirectCopy
        );
        assert_eq!(InterleaveAdjoint::from_str(""), InterleaveAdjoint::Exact);
    }

    #[test]
    fn test_partial_json() {
        let config: ResampleConfig =
            serde_json::from_str(r#"{"spline": ["linear", "cubic", "nearest"], "parallel": false}"#)
                .unwrap();
        assert_eq!(
            config.spline,
            SplineTypes::new(SplineKind::Linear, SplineKind::Cubic, SplineKind::Nearest)
        );
        assert!(!config.parallel);
        assert_eq!(config.view_extension, ViewExtension::Replicate);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resample.json");
        std::fs::write(
            &path,
            r#"{"remove_interleaving": true, "interleave_adjoint": "direct_copy"}"#,
        )
        .unwrap();

        let config = ResampleConfig::from_json_file(&path).unwrap();
        assert!(config.remove_interleaving);
        assert_eq!(config.interleave_adjoint, InterleaveAdjoint::DirectCopy);

        let missing = ResampleConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(crate::ResampleError::Config(_))));
    }
}
