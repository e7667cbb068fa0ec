//! Shared test utilities for the sinogram resampling workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Deterministic sample volume generators
//! - Geometry fixtures, including a fully configurable uniform geometry
//! - Tracing setup for tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, smooth_volume};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a tracing subscriber writing to the test output.
///
/// The filter is read from `RUST_LOG` and defaults to `debug`. Safe to call
/// from every test; only the first call installs the subscriber.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting two inner products agree relative to their magnitude.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_adjoint;
///
/// assert_adjoint!(push_dot, pull_dot, 1e-4);
/// ```
#[macro_export]
macro_rules! assert_adjoint {
    ($lhs:expr, $rhs:expr, $rel:expr) => {{
        let lhs: f64 = $lhs;
        let rhs: f64 = $rhs;
        let tolerance = ($rel as f64) * lhs.abs().max(rhs.abs()).max(1.0);
        $crate::assert_approx_eq!(lhs, rhs, tolerance);
    }};
}
