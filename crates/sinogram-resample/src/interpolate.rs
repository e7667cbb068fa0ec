//! Entry points resampling segment 0 of one projection-data container onto
//! the geometry of another.

use sinogram_common::{ProjData, ProjDataError, ProjDataGeometry, SampleVolume};
use tracing::{debug, instrument, warn};

use crate::config::{InterleaveAdjoint, ResampleConfig};
use crate::error::{ResampleError, Result};
use crate::extend::{extend_boundaries, transpose_extend_boundaries};
use crate::interleave::{
    non_interleaved_shape, remove_interleaving, restore_interleaving, transpose_remove_interleaving,
};
use crate::mapping::{pull_map, push_map};
use crate::sampling::{sample_on_regular_grid_pull, sample_on_regular_grid_push};
use crate::spline::{SplineKind, SplineTypes};

/// Largest ring radius difference (mm) between compatible geometries.
pub const RING_RADIUS_TOLERANCE: f64 = 1.0;

const SEGMENT: i32 = 0;

/// Check that data can be resampled from `input` to `output`.
pub fn check_compatibility(input: &dyn ProjDataGeometry, output: &dyn ProjDataGeometry) -> Result<()> {
    if input.family() != output.family() {
        return Err(ResampleError::IncompatibleGeometry {
            input: input.family(),
            output: output.family(),
        });
    }
    if (input.ring_radius() - output.ring_radius()).abs() > RING_RADIUS_TOLERANCE {
        return Err(ResampleError::RingRadiusMismatch {
            input: input.ring_radius(),
            output: output.ring_radius(),
            tolerance: RING_RADIUS_TOLERANCE,
        });
    }
    Ok(())
}

/// Resample `input` onto `out` with one spline kind on every axis.
pub fn interpolate_projdata(
    out: &mut dyn ProjData,
    input: &dyn ProjData,
    kind: SplineKind,
    remove_interleaving: bool,
    use_view_offset: bool,
) -> Result<()> {
    interpolate_projdata_with_types(
        out,
        input,
        SplineTypes::uniform(kind),
        remove_interleaving,
        use_view_offset,
    )
}

/// Resample `input` onto `out` with a spline kind per axis.
pub fn interpolate_projdata_with_types(
    out: &mut dyn ProjData,
    input: &dyn ProjData,
    spline: SplineTypes,
    remove_interleaving: bool,
    use_view_offset: bool,
) -> Result<()> {
    let config = ResampleConfig {
        spline,
        remove_interleaving,
        use_view_offset,
        ..ResampleConfig::default()
    };
    interpolate_projdata_pull(out, input, &config)
}

/// Evaluate the spline fitted to `input` at every bin of `out`.
#[instrument(skip_all, fields(spline = %config.spline, remove_interleaving = config.remove_interleaving))]
pub fn interpolate_projdata_pull(
    out: &mut dyn ProjData,
    input: &dyn ProjData,
    config: &ResampleConfig,
) -> Result<()> {
    let input_geometry = input.geometry();
    check_compatibility(input_geometry, out.geometry())?;
    warn_experimental(config);

    let map = pull_map(input_geometry, out.geometry(), config.mapping_options());
    debug!(offset = ?map.offset, step = ?map.step, "Pull map");

    let mut segment = input.segment(SEGMENT)?;
    if config.remove_interleaving {
        segment = remove_interleaving(&segment, input_geometry.family())?;
    }

    let extended = extend_boundaries(&segment, config.view_extension)?;
    debug!(
        min = ?extended.min(),
        max = ?extended.max(),
        "Extended input to {}",
        extended.describe()
    );

    let mut target = out.empty_segment(SEGMENT)?;
    sample_on_regular_grid_pull(&mut target, &extended, config.spline, &map, config.parallel)?;

    out.set_segment(SEGMENT, &target).map_err(ResampleError::commit)
}

/// Adjoint of [`interpolate_projdata_pull`]: scatter `input` onto `out`.
///
/// `input` lives on the grid the pull would fill and `out` on the grid the
/// pull would read.
#[instrument(skip_all, fields(spline = %config.spline, remove_interleaving = config.remove_interleaving))]
pub fn interpolate_projdata_push(
    out: &mut dyn ProjData,
    input: &dyn ProjData,
    config: &ResampleConfig,
) -> Result<()> {
    let output_geometry = out.geometry();
    check_compatibility(input.geometry(), output_geometry)?;
    warn_experimental(config);

    let map = push_map(input.geometry(), output_geometry, config.mapping_options());
    debug!(offset = ?map.offset, step = ?map.step, "Push map");

    let family = output_geometry.family();
    let shape = if config.remove_interleaving {
        non_interleaved_shape(output_geometry, SEGMENT)?
    } else {
        output_geometry
            .segment_shape(SEGMENT)
            .ok_or(ProjDataError::SegmentNotFound(SEGMENT))?
    };

    let segment = input.segment(SEGMENT)?;
    let [ra, rv, rt] = shape.ranges();
    let mut extended = SampleVolume::zeros([ra, rv.grow(1), rt.grow(1)]);
    sample_on_regular_grid_push(&mut extended, &segment, config.spline, &map, config.parallel)?;

    let mut result = transpose_extend_boundaries(&extended, config.view_extension)?;
    if config.remove_interleaving {
        result = match config.interleave_adjoint {
            InterleaveAdjoint::Exact => transpose_remove_interleaving(&result, family)?,
            InterleaveAdjoint::DirectCopy => restore_interleaving(&result, family)?,
        };
    }
    debug!(sum = result.sum(), "Pushed onto {}", result.describe());

    out.set_segment(SEGMENT, &result).map_err(ResampleError::commit)
}

fn warn_experimental(config: &ResampleConfig) {
    if config.use_view_offset {
        warn!("View offset mode is experimental and has not been validated");
    }
}
