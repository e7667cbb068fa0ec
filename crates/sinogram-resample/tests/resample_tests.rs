//! End-to-end tests of the resampling entry points on in-memory containers.

use sinogram_common::{
    Axis, AxisRange, CylindricalGeometry, GeometryFamily, InMemoryProjData, ProjData,
    ProjDataError, ProjDataGeometry, ProjDataResult, SampleVolume,
};
use sinogram_resample::{
    interpolate_projdata, interpolate_projdata_pull, interpolate_projdata_push, pull_map,
    InterleaveAdjoint, MappingOptions, ResampleConfig, ResampleError, SplineKind, ViewExtension,
};
use test_utils::{
    assert_adjoint, assert_approx_eq, index_volume, init_tracing, proj_data, scanners,
    smooth_volume, UniformGeometry,
};

const KINDS: [SplineKind; 3] = [SplineKind::Nearest, SplineKind::Linear, SplineKind::Cubic];

fn segment_ranges(geometry: &dyn ProjDataGeometry) -> [AxisRange; 3] {
    geometry.segment_shape(0).unwrap().ranges()
}

/// Positive test pattern, so inner products have no cancellation.
fn wavy_volume(ranges: [AxisRange; 3]) -> SampleVolume {
    SampleVolume::from_fn(ranges, |a, v, t| {
        2.0 + ((a * 7 + v * 3 + t) as f32 * 0.45).sin()
    })
}

/// `(<push(x), y>, prod(step) * <x, pull(y)>)` for data on `small` (x) and
/// `large` (y).
fn adjoint_pair<G>(small: G, large: G, config: &ResampleConfig) -> (f64, f64)
where
    G: ProjDataGeometry + Clone,
{
    let x = smooth_volume(segment_ranges(&small));
    let y = wavy_volume(segment_ranges(&large));

    let y_data = proj_data(large.clone(), y.clone());
    let mut pulled = InMemoryProjData::new(small.clone());
    interpolate_projdata_pull(&mut pulled, &y_data, config).unwrap();

    let x_data = proj_data(small.clone(), x.clone());
    let mut pushed = InMemoryProjData::new(large.clone());
    interpolate_projdata_push(&mut pushed, &x_data, config).unwrap();

    let scale = pull_map(&large, &small, config.mapping_options()).volume_scale();
    let lhs = pushed.segment(0).unwrap().dot(&y).unwrap();
    let rhs = scale * x.dot(&pulled.segment(0).unwrap()).unwrap();
    (lhs, rhs)
}

// =============================================================================
// Pull Tests
// =============================================================================

#[test]
fn test_identity_resampling() {
    init_tracing();
    let geom = scanners::small_arc_corrected();
    let input = smooth_volume(segment_ranges(&geom));
    let source = proj_data(geom.clone(), input.clone());

    for kind in KINDS {
        let mut out = InMemoryProjData::new(geom.clone());
        interpolate_projdata(&mut out, &source, kind, false, false).unwrap();
        let result = out.segment(0).unwrap();
        for (got, want) in result.data().iter().zip(input.data()) {
            assert_approx_eq!(*got, *want, 1e-3);
        }
    }
}

#[test]
fn test_half_spacing_gives_half_step() {
    let ranges_in = [AxisRange::new(0, 1), AxisRange::new(0, 3), AxisRange::symmetric(4)];
    let ranges_out = [AxisRange::new(0, 1), AxisRange::new(0, 3), AxisRange::symmetric(8)];
    let coarse = UniformGeometry::new(ranges_in);
    let fine = UniformGeometry::new(ranges_out).with_spacing(Axis::Tangential, 0.5);

    let map = pull_map(&coarse, &fine, MappingOptions::default());
    assert_approx_eq!(map.step[2], 0.5, 1e-12);
    assert_approx_eq!(map.offset[2], 0.0, 1e-12);

    // a linear profile is reproduced exactly by linear interpolation
    let input = SampleVolume::from_fn(ranges_in, |_, _, t| t as f32);
    let source = proj_data(coarse, input);
    let mut out = InMemoryProjData::new(fine);
    interpolate_projdata_pull(&mut out, &source, &ResampleConfig::default()).unwrap();

    let result = out.segment(0).unwrap();
    for t in -8..=8 {
        assert_approx_eq!(result[[1, 2, t]], 0.5 * t as f32, 1e-5);
    }
}

#[test]
fn test_origin_shift_gives_offset() {
    let ranges = [AxisRange::new(0, 0), AxisRange::new(0, 2), AxisRange::symmetric(4)];
    let input_geom = UniformGeometry::new(ranges);
    let output_geom = UniformGeometry::new(ranges).with_origin(Axis::Tangential, 1.0);

    let map = pull_map(&input_geom, &output_geom, MappingOptions::default());
    assert_approx_eq!(map.offset[2], 1.0, 1e-12);

    let input = index_volume(ranges);
    let source = proj_data(input_geom, input.clone());
    let mut out = InMemoryProjData::new(output_geom);
    interpolate_projdata_pull(&mut out, &source, &ResampleConfig::with_spline(SplineKind::Linear))
        .unwrap();

    let result = out.segment(0).unwrap();
    for t in -4..=3 {
        assert_approx_eq!(result[[0, 1, t]], input[[0, 1, t + 1]], 1e-3);
    }
    // the last output bin reads the replicated edge
    assert_approx_eq!(result[[0, 1, 4]], input[[0, 1, 4]], 1e-3);
}

#[test]
fn test_sequential_and_parallel_pull_agree() {
    let fine = scanners::small_arc_corrected();
    let coarse = scanners::coarse_arc_corrected();
    let source = proj_data(fine.clone(), smooth_volume(segment_ranges(&fine)));

    let mut results = Vec::new();
    for parallel in [false, true] {
        let config = ResampleConfig {
            parallel,
            ..ResampleConfig::with_spline(SplineKind::Cubic)
        };
        let mut out = InMemoryProjData::new(coarse.clone());
        interpolate_projdata_pull(&mut out, &source, &config).unwrap();
        results.push(out.segment(0).unwrap());
    }
    assert_eq!(results[0], results[1]);
}

#[test]
fn test_view_offset_without_tilt_changes_nothing() {
    let geom = scanners::small_arc_corrected();
    let source = proj_data(geom.clone(), smooth_volume(segment_ranges(&geom)));

    let mut plain = InMemoryProjData::new(scanners::coarse_arc_corrected());
    interpolate_projdata(&mut plain, &source, SplineKind::Linear, false, false).unwrap();
    let mut offset = InMemoryProjData::new(scanners::coarse_arc_corrected());
    interpolate_projdata(&mut offset, &source, SplineKind::Linear, false, true).unwrap();

    assert_eq!(plain.segment(0).unwrap(), offset.segment(0).unwrap());
}

// =============================================================================
// Adjoint Tests
// =============================================================================

#[test]
fn test_push_is_adjoint_of_pull() {
    init_tracing();
    for kind in KINDS {
        let config = ResampleConfig::with_spline(kind);
        let (lhs, rhs) = adjoint_pair(
            scanners::coarse_arc_corrected(),
            scanners::small_arc_corrected(),
            &config,
        );
        assert_adjoint!(lhs, rhs, 1e-4);
    }
}

#[test]
fn test_push_is_adjoint_of_pull_with_periodic_views() {
    let config = ResampleConfig {
        view_extension: ViewExtension::Periodic,
        ..ResampleConfig::with_spline(SplineKind::Cubic)
    };
    let (lhs, rhs) = adjoint_pair(
        scanners::coarse_arc_corrected(),
        scanners::small_arc_corrected(),
        &config,
    );
    assert_adjoint!(lhs, rhs, 1e-4);
}

#[test]
fn test_push_is_adjoint_of_pull_with_interleaving_removed() {
    let large = scanners::small_non_arc_corrected();
    for small in [
        scanners::small_non_arc_corrected(),
        CylindricalGeometry::non_arc_corrected(4, 3, AxisRange::symmetric(6)),
    ] {
        for kind in [SplineKind::Linear, SplineKind::Cubic] {
            let config = ResampleConfig {
                remove_interleaving: true,
                interleave_adjoint: InterleaveAdjoint::Exact,
                ..ResampleConfig::with_spline(kind)
            };
            let (lhs, rhs) = adjoint_pair(small.clone(), large.clone(), &config);
            assert_adjoint!(lhs, rhs, 1e-4);
        }
    }
}

#[test]
fn test_direct_copy_push_differs_from_exact() {
    let geom = scanners::small_non_arc_corrected();
    let source = proj_data(geom.clone(), smooth_volume(segment_ranges(&geom)));

    let mut outputs = Vec::new();
    for adjoint in [InterleaveAdjoint::Exact, InterleaveAdjoint::DirectCopy] {
        let config = ResampleConfig {
            remove_interleaving: true,
            interleave_adjoint: adjoint,
            ..ResampleConfig::default()
        };
        let mut out = InMemoryProjData::new(geom.clone());
        interpolate_projdata_push(&mut out, &source, &config).unwrap();
        outputs.push(out.segment(0).unwrap());
    }
    assert_eq!(outputs[0].ranges(), outputs[1].ranges());
    // the exact transpose also routes back the averaged cells
    assert!(outputs[0].sum() > outputs[1].sum());
}

// =============================================================================
// Error Tests
// =============================================================================

/// Container that refuses every write.
struct ReadOnlyProjData(CylindricalGeometry);

impl ProjData for ReadOnlyProjData {
    fn geometry(&self) -> &dyn ProjDataGeometry {
        &self.0
    }

    fn segment(&self, segment: i32) -> ProjDataResult<SampleVolume> {
        self.empty_segment(segment)
    }

    fn set_segment(&mut self, _segment: i32, volume: &SampleVolume) -> ProjDataResult<()> {
        Err(ProjDataError::shape_mismatch("read-only container", volume.describe()))
    }
}

#[test]
fn test_incompatible_family_commits_nothing() {
    let arc = scanners::small_arc_corrected();
    let source = proj_data(arc.clone(), smooth_volume(segment_ranges(&arc)));
    let mut out = InMemoryProjData::new(scanners::small_non_arc_corrected());

    let err = interpolate_projdata_pull(&mut out, &source, &ResampleConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ResampleError::IncompatibleGeometry {
            input: GeometryFamily::ArcCorrected,
            output: GeometryFamily::NonArcCorrectedCylindrical,
        }
    ));
    assert!(err.is_configuration_error());
    assert!(out.segment_ref(0).is_none());
}

#[test]
fn test_ring_radius_mismatch() {
    let geom = scanners::small_arc_corrected();
    let source = proj_data(geom.clone(), smooth_volume(segment_ranges(&geom)));
    let mut out = InMemoryProjData::new(geom.clone().with_ring_radius(405.0));

    let err = interpolate_projdata_push(&mut out, &source, &ResampleConfig::default()).unwrap_err();
    assert!(matches!(err, ResampleError::RingRadiusMismatch { .. }));
    assert!(out.segment_ref(0).is_none());
}

#[test]
fn test_interleaving_rejected_for_arc_corrected() {
    let geom = scanners::small_arc_corrected();
    let source = proj_data(geom.clone(), smooth_volume(segment_ranges(&geom)));
    let config = ResampleConfig {
        remove_interleaving: true,
        ..ResampleConfig::default()
    };

    let mut out = InMemoryProjData::new(geom.clone());
    let err = interpolate_projdata_pull(&mut out, &source, &config).unwrap_err();
    assert!(matches!(err, ResampleError::UnsupportedGeometry(_)));

    let err = interpolate_projdata_push(&mut out, &source, &config).unwrap_err();
    assert!(matches!(err, ResampleError::UnsupportedGeometry(_)));
    assert!(out.segment_ref(0).is_none());
}

#[test]
fn test_commit_failure_is_reported() {
    let geom = scanners::small_arc_corrected();
    let source = proj_data(geom.clone(), smooth_volume(segment_ranges(&geom)));
    let mut out = ReadOnlyProjData(geom);

    let err = interpolate_projdata_pull(&mut out, &source, &ResampleConfig::default()).unwrap_err();
    assert!(matches!(err, ResampleError::Commit(ProjDataError::ShapeMismatch { .. })));
    assert!(!err.is_configuration_error());
}
