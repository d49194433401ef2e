//! Unit tests for the atmos_vert numeric modules
//!
//! These cover unit normalisation, half/full-level conversion, layer
//! thickness and integration on plain `ndarray` arrays.

use approx::assert_relative_eq;
use atmos_vert::{
    constants::GRAV,
    errors::{AtmosVertError, Result},
    integrate::{int_dp_g, integrate, masked_sum_axis, resolve_axis, weight_by_delta},
    units::{max_abs, to_hpa, to_pascal, to_radians, PressureField},
    vertical::{
        default_vertical_axis, dp_from_p, dp_from_phalf, dp_from_sigma, level_thickness,
        pfull_from_phalf, pfull_from_sigma, phalf_from_pfull, phalf_from_ps, phalf_from_sigma,
        surface_vertical_axis,
    },
};
use ndarray::{arr0, arr1, arr2, Array1, Array3, Array4, ArrayD, Axis, IxDyn};
use std::f64::consts::PI;
use std::io;
use std::sync::{Arc, Mutex};

#[test]
fn test_error_types() {
    let dim_err = AtmosVertError::DimensionNotFound {
        dim: "pfull".to_string(),
    };
    assert!(format!("{}", dim_err).contains("Dimension 'pfull' not found"));

    let axis_err = AtmosVertError::InvalidAxis { axis: -5, ndim: 3 };
    assert_eq!(
        format!("{}", axis_err),
        "Axis -5 is out of bounds for array with 3 dimensions"
    );

    let attr_err = AtmosVertError::AttributeNotFound {
        attr: "dt".to_string(),
        object: "run".to_string(),
    };
    assert!(format!("{}", attr_err).contains("Attribute 'dt' not found in parent of run"));

    let generic_err = AtmosVertError::from("Test error");
    assert_eq!(format!("{}", generic_err), "Test error");
}

#[test]
fn test_max_abs_skips_non_finite() {
    let field = arr1(&[f64::NAN, -3.0, 2.0, f64::INFINITY]);
    assert_eq!(max_abs(&field), Some(3.0));

    let empty = Array1::<f64>::zeros(0);
    assert_eq!(max_abs(&empty), None);

    let all_nan = arr1(&[f64::NAN, f64::NAN]);
    assert_eq!(max_abs(&all_nan), None);
}

#[test]
fn test_to_pascal_is_idempotent() {
    let mut p = arr1(&[1000.0, 850.0, 500.0]);
    assert!(to_pascal(&mut p, PressureField::Level));
    assert_eq!(p, arr1(&[100_000.0, 85_000.0, 50_000.0]));

    // Second call sees Pa magnitudes and leaves the field alone
    assert!(!to_pascal(&mut p, PressureField::Level));
    assert_eq!(p, arr1(&[100_000.0, 85_000.0, 50_000.0]));
}

#[test]
fn test_to_pascal_thickness_threshold() {
    // 800 is hPa-sized for a pressure level but Pa-sized for a layer thickness
    let mut level = arr1(&[800.0, 200.0]);
    assert!(to_pascal(&mut level, PressureField::Level));
    assert_eq!(level, arr1(&[80_000.0, 20_000.0]));

    let mut thickness = arr1(&[800.0, 200.0]);
    assert!(!to_pascal(&mut thickness, PressureField::Thickness));
    assert_eq!(thickness, arr1(&[800.0, 200.0]));

    let mut thin = arr1(&[150.0, 350.0]);
    assert!(to_pascal(&mut thin, PressureField::Thickness));
    assert_eq!(thin, arr1(&[15_000.0, 35_000.0]));
}

#[test]
fn test_to_pascal_ignores_masked_values() {
    let mut dp = arr1(&[f64::NAN, 25.0, 325.0]);
    assert!(to_pascal(&mut dp, PressureField::Thickness));
    assert!(dp[0].is_nan());
    assert_eq!(dp[1], 2500.0);
    assert_eq!(dp[2], 32_500.0);
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut logs) = self.0.lock() {
            logs.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    /// Run `f` with a WARN-level subscriber writing into these logs.
    fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    fn take(&self) -> String {
        self.0
            .lock()
            .map(|mut logs| String::from_utf8_lossy(&std::mem::take(&mut *logs)).into_owned())
            .unwrap_or_default()
    }
}

#[test]
fn test_to_pascal_logs_conversion() {
    let logs = CapturedLogs::default();
    let mut p = arr1(&[1000.0, 500.0]);

    assert!(logs.capture(|| to_pascal(&mut p, PressureField::Level)));
    let first = logs.take();
    assert!(first.contains("WARN"), "no warning in {first:?}");
    assert!(first.contains("converting to Pa"));

    // Already in Pa: nothing to report
    assert!(!logs.capture(|| to_pascal(&mut p, PressureField::Level)));
    assert_eq!(logs.take(), "");
}

#[test]
fn test_to_radians_logs_conversion() {
    let logs = CapturedLogs::default();
    let mut lat = arr1(&[-90.0, 0.0, 90.0]);

    assert!(logs.capture(|| to_radians(&mut lat)));
    let first = logs.take();
    assert!(first.contains("WARN"), "no warning in {first:?}");
    assert!(first.contains("converting to radians"));

    assert!(!logs.capture(|| to_radians(&mut lat)));
    assert_eq!(logs.take(), "");
}

#[test]
fn test_to_hpa() {
    let mut ps = arr2(&[[101_325.0, 95_000.0], [70_000.0, 100_000.0]]);
    assert!(to_hpa(&mut ps));
    assert_relative_eq!(ps[[0, 0]], 1013.25, epsilon = 1e-9);
    assert_relative_eq!(ps[[1, 0]], 700.0, epsilon = 1e-9);

    assert!(!to_hpa(&mut ps));
    assert_relative_eq!(ps[[0, 0]], 1013.25, epsilon = 1e-9);
}

#[test]
fn test_to_radians() {
    let mut lat = arr1(&[-90.0, 0.0, 45.0, 90.0]);
    assert!(to_radians(&mut lat));
    assert_relative_eq!(lat[0], -PI / 2.0, epsilon = 1e-12);
    assert_relative_eq!(lat[2], PI / 4.0, epsilon = 1e-12);

    // Already radians, including a full turn of longitude
    let mut lon = arr1(&[0.0, PI, 2.0 * PI]);
    assert!(!to_radians(&mut lon));
    assert_eq!(lon[2], 2.0 * PI);

    // Just past the 4π threshold counts as degrees
    let mut small = arr1(&[0.0, 13.0]);
    assert!(to_radians(&mut small));
    assert_relative_eq!(small[1], 13.0_f64.to_radians(), epsilon = 1e-12);
}

#[test]
fn test_axis_conventions() -> Result<()> {
    assert_eq!(surface_vertical_axis(0)?, Axis(0));
    assert_eq!(surface_vertical_axis(2)?, Axis(0));
    assert_eq!(surface_vertical_axis(3)?, Axis(1));
    assert!(matches!(
        surface_vertical_axis(1),
        Err(AtmosVertError::DimensionMismatch { found: 1, .. })
    ));

    assert_eq!(default_vertical_axis(4), Axis(1));
    assert_eq!(default_vertical_axis(3), Axis(0));
    assert_eq!(default_vertical_axis(1), Axis(0));

    assert_eq!(resolve_axis(-3, 4)?, Axis(1));
    assert_eq!(resolve_axis(2, 3)?, Axis(2));
    assert!(resolve_axis(3, 3).is_err());
    assert!(resolve_axis(-4, 3).is_err());
    Ok(())
}

#[test]
fn test_phalf_from_ps_pure_sigma_equals_surface_pressure() -> Result<()> {
    let bk = arr1(&[1.0, 1.0, 1.0]);
    let pk = arr1(&[0.0, 0.0, 0.0]);
    let ps = arr2(&[[100_000.0, 95_000.0, 90_000.0], [85_000.0, 101_000.0, 99_000.0]]).into_dyn();

    let phalf = phalf_from_ps(bk.view(), pk.view(), ps.view())?;
    assert_eq!(phalf.shape(), &[3, 2, 3]);
    for level in phalf.axis_iter(Axis(0)) {
        assert_eq!(level, ps.view());
    }
    Ok(())
}

#[test]
fn test_phalf_from_ps_with_time_axis() -> Result<()> {
    let bk = arr1(&[0.0, 0.5, 1.0]);
    let pk = arr1(&[0.0, 1000.0, 0.0]);
    let ps = Array3::from_shape_fn((4, 2, 3), |(t, y, x)| 90_000.0 + 1000.0 * (t + y + x) as f64)
        .into_dyn();

    let phalf = phalf_from_sigma(bk.view(), pk.view(), ps.view())?;
    assert_eq!(phalf.shape(), &[4, 3, 2, 3]);

    assert_eq!(phalf[[2, 0, 1, 1]], 0.0);
    assert_eq!(phalf[[2, 1, 1, 1]], 1000.0 + 0.5 * 94_000.0);
    assert_eq!(phalf[[2, 2, 1, 1]], 94_000.0);
    Ok(())
}

#[test]
fn test_phalf_from_ps_single_column() -> Result<()> {
    let bk = arr1(&[0.0, 0.25, 1.0]);
    let pk = arr1(&[0.0, 3000.0, 0.0]);
    let ps = arr0(100_000.0).into_dyn();

    let phalf = phalf_from_ps(bk.view(), pk.view(), ps.view())?;
    assert_eq!(phalf.shape(), &[3]);
    assert_eq!(phalf.iter().copied().collect::<Vec<_>>(), vec![0.0, 28_000.0, 100_000.0]);
    Ok(())
}

#[test]
fn test_phalf_from_ps_rejects_bad_input() {
    let ps = arr2(&[[100_000.0]]).into_dyn();
    let result = phalf_from_ps(arr1(&[0.0, 1.0]).view(), arr1(&[0.0]).view(), ps.view());
    assert!(matches!(result, Err(AtmosVertError::ShapeMismatch { .. })));

    let ps_1d = arr1(&[100_000.0, 90_000.0]).into_dyn();
    let result = phalf_from_ps(arr1(&[0.0, 1.0]).view(), arr1(&[0.0, 0.0]).view(), ps_1d.view());
    assert!(matches!(
        result,
        Err(AtmosVertError::DimensionMismatch { found: 1, .. })
    ));
}

#[test]
fn test_pfull_from_phalf() -> Result<()> {
    let phalf = arr1(&[0.0, 100.0, 300.0, 700.0]).into_dyn();
    let pfull = pfull_from_phalf(phalf.view(), Axis(0))?;
    assert_eq!(pfull, arr1(&[50.0, 200.0, 500.0]).into_dyn());

    // Along the second axis of (time, phalf, lat, lon) data
    let phalf_4d = Array4::from_shape_fn((2, 3, 1, 2), |(t, k, _, x)| (10 * k + t + x) as f64).into_dyn();
    let pfull_4d = pfull_from_phalf(phalf_4d.view(), default_vertical_axis(4))?;
    assert_eq!(pfull_4d.shape(), &[2, 2, 1, 2]);
    assert_eq!(pfull_4d[[1, 0, 0, 1]], 7.0);
    assert_eq!(pfull_4d[[1, 1, 0, 1]], 17.0);
    Ok(())
}

#[test]
fn test_pfull_from_phalf_needs_two_levels() {
    let phalf = arr1(&[100.0]).into_dyn();
    assert!(matches!(
        pfull_from_phalf(phalf.view(), Axis(0)),
        Err(AtmosVertError::TooFewLevels {
            required: 2,
            found: 1
        })
    ));
    assert!(matches!(
        pfull_from_phalf(phalf.view(), Axis(1)),
        Err(AtmosVertError::InvalidAxis { axis: 1, ndim: 1 })
    ));
}

#[test]
fn test_phalf_from_pfull_boundaries() -> Result<()> {
    let pfull = arr2(&[[100.0, 200.0], [300.0, 400.0], [500.0, 800.0]]).into_dyn();
    let phalf = phalf_from_pfull(pfull.view(), Axis(0), 0.0, 1000.0)?;

    assert_eq!(phalf.shape(), &[4, 2]);
    assert_eq!(
        phalf,
        arr2(&[[0.0, 0.0], [200.0, 300.0], [400.0, 600.0], [1000.0, 1000.0]]).into_dyn()
    );

    let single = arr1(&[500.0]).into_dyn();
    let phalf = phalf_from_pfull(single.view(), Axis(0), 0.0, 0.0)?;
    assert_eq!(phalf, arr1(&[0.0, 0.0]).into_dyn());
    Ok(())
}

#[test]
fn test_half_full_round_trip_keeps_interior() -> Result<()> {
    // Linear profile: averaging twice gives back the interior points exactly
    let x = arr1(&[1.0, 2.0, 3.0, 4.0, 5.0]).into_dyn();
    let phalf = phalf_from_pfull(x.view(), Axis(0), 0.0, 0.0)?;
    let back = pfull_from_phalf(phalf.view(), Axis(0))?;

    assert_eq!(back.len(), x.len());
    for k in 1..x.len() - 1 {
        assert_eq!(back[[k]], x[[k]]);
    }
    // Boundary values are lost to the zero boundary conditions
    assert_eq!(back[[0]], 0.75);
    Ok(())
}

#[test]
fn test_dp_from_phalf() -> Result<()> {
    let phalf = arr1(&[0.0, 10_000.0, 50_000.0, 100_000.0]).into_dyn();
    let dp = dp_from_phalf(phalf.view(), Axis(0))?;
    assert_eq!(dp, arr1(&[10_000.0, 40_000.0, 50_000.0]).into_dyn());

    // Bottom-first ordering gives negative thicknesses
    let reversed = arr1(&[100_000.0, 50_000.0]).into_dyn();
    let dp = dp_from_phalf(reversed.view(), Axis(0))?;
    assert_eq!(dp, arr1(&[-50_000.0]).into_dyn());
    Ok(())
}

#[test]
fn test_dp_from_sigma_sums_to_surface_pressure() -> Result<()> {
    let bk = arr1(&[0.0, 0.0, 0.25, 0.6, 1.0]);
    let pk = arr1(&[0.0, 5000.0, 8000.0, 3000.0, 0.0]);
    let ps = arr2(&[[100_000.0, 98_500.0], [87_000.0, 101_200.0]]).into_dyn();

    let dp = dp_from_sigma(bk.view(), pk.view(), ps.view())?;
    assert_eq!(dp.shape(), &[4, 2, 2]);
    assert!(dp.iter().all(|&v| v > 0.0));

    let total = dp.sum_axis(Axis(0));
    for (column, surface) in total.iter().zip(ps.iter()) {
        assert_relative_eq!(*column, *surface, max_relative = 1e-12);
    }

    let pfull = pfull_from_sigma(bk.view(), pk.view(), ps.view())?;
    assert_eq!(pfull.shape(), &[4, 2, 2]);
    assert_relative_eq!(pfull[[0, 0, 0]], 2500.0);
    assert_relative_eq!(pfull[[3, 0, 0]], 0.5 * (3000.0 + 60_000.0 + 100_000.0));
    Ok(())
}

#[test]
fn test_level_thickness_standard_levels() -> Result<()> {
    let p = arr1(&[1000.0, 850.0, 500.0, 200.0]);
    let dp = level_thickness(p.view())?;

    assert_eq!(dp.len(), p.len());
    assert_relative_eq!(dp[0], 7_500.0);
    assert_relative_eq!(dp[1], 25_000.0);
    assert_relative_eq!(dp[2], 32_500.0);
    assert_relative_eq!(dp[3], 35_000.0);

    // Bottom level is the lower boundary, top layer reaches 0 Pa
    assert_relative_eq!(dp.sum(), 100_000.0);

    // Input is not modified and Pa input gives the same answer
    assert_eq!(p[0], 1000.0);
    let dp_pa = level_thickness(p.mapv(|v| v * 100.0).view())?;
    assert_eq!(dp, dp_pa);
    Ok(())
}

#[test]
fn test_level_thickness_two_levels() -> Result<()> {
    let dp = level_thickness(arr1(&[100_000.0, 50_000.0]).view())?;
    assert_eq!(dp, arr1(&[25_000.0, 75_000.0]));

    assert!(matches!(
        level_thickness(arr1(&[1000.0]).view()),
        Err(AtmosVertError::TooFewLevels { .. })
    ));
    Ok(())
}

#[test]
fn test_level_thickness_ascending_levels() -> Result<()> {
    let dp = level_thickness(arr1(&[200.0, 500.0, 850.0, 1000.0]).view())?;

    // Same layers as the bottom-first column, in the input order
    assert_eq!(dp, arr1(&[35_000.0, 32_500.0, 25_000.0, 7_500.0]));
    assert!(dp.iter().all(|&v| v > 0.0));
    assert_relative_eq!(dp.sum(), 100_000.0);
    Ok(())
}

#[test]
fn test_dp_from_p_standard_column() -> Result<()> {
    let p = arr1(&[1000.0, 850.0, 500.0, 200.0]);
    let ps = arr0(1013.25).into_dyn();

    let dp = dp_from_p(p.view(), ps.view())?;
    assert_eq!(dp.shape(), &[4]);

    // Edges: 1100 (clipped to 1013.25), 925, 675, 350, 0 hPa
    let expected = [8_825.0, 25_000.0, 32_500.0, 35_000.0];
    for (value, expected) in dp.iter().zip(expected) {
        assert_relative_eq!(*value, expected, epsilon = 1e-6);
    }
    assert_relative_eq!(dp.sum(), 101_325.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_dp_from_p_masks_levels_below_surface() -> Result<()> {
    let p = arr1(&[1000.0, 850.0, 500.0, 200.0]);
    let ps = arr0(900.0).into_dyn();

    let dp = dp_from_p(p.view(), ps.view())?;
    assert!(dp[[0]].is_nan());
    assert_relative_eq!(dp[[1]], 22_500.0, epsilon = 1e-6);
    assert_relative_eq!(dp[[2]], 32_500.0, epsilon = 1e-6);
    assert_relative_eq!(dp[[3]], 35_000.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_dp_from_p_ascending_levels() -> Result<()> {
    let p = arr1(&[200.0, 500.0, 850.0, 1000.0]);
    let ps = arr0(1013.25).into_dyn();

    let dp = dp_from_p(p.view(), ps.view())?;
    let expected = [35_000.0, 32_500.0, 25_000.0, 8_825.0];
    for (value, expected) in dp.iter().zip(expected) {
        assert_relative_eq!(*value, expected, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_dp_from_p_gridded_surface_pressure() -> Result<()> {
    let p = arr1(&[100_000.0, 85_000.0, 50_000.0, 20_000.0]);
    // (time, lat, lon) in hPa
    let ps = Array3::from_shape_vec((2, 1, 2), vec![1013.25, 900.0, 950.0, 1013.25])?.into_dyn();

    let dp = dp_from_p(p.view(), ps.view())?;
    assert_eq!(dp.shape(), &[2, 4, 1, 2]);

    assert_relative_eq!(dp[[0, 0, 0, 0]], 8_825.0, epsilon = 1e-6);
    assert!(dp[[0, 0, 0, 1]].is_nan());
    assert_relative_eq!(dp[[0, 1, 0, 1]], 22_500.0, epsilon = 1e-6);

    // 950 hPa: bottom level underground, next layer keeps its nominal depth
    assert!(dp[[1, 0, 0, 0]].is_nan());
    assert_relative_eq!(dp[[1, 1, 0, 0]], 25_000.0, epsilon = 1e-6);
    assert_relative_eq!(dp[[1, 3, 0, 1]], 35_000.0, epsilon = 1e-6);

    // Input surface pressure is untouched
    assert_eq!(ps[[0, 0, 1]], 900.0);
    Ok(())
}

#[test]
fn test_weight_by_delta_along_axis() -> Result<()> {
    let integrand = Array4::<f64>::ones((2, 3, 2, 2)).into_dyn();
    let delta = arr1(&[10.0, 20.0, 30.0]).into_dyn();

    let weighted = weight_by_delta(integrand.view(), delta.view(), Axis(1))?;
    assert_eq!(weighted.shape(), &[2, 3, 2, 2]);
    assert_eq!(weighted[[1, 2, 1, 0]], 30.0);

    let bad = arr1(&[1.0, 2.0, 3.0, 4.0, 5.0]).into_dyn();
    assert!(matches!(
        weight_by_delta(integrand.view(), bad.view(), Axis(1)),
        Err(AtmosVertError::ShapeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_integrate() -> Result<()> {
    let integrand = Array4::from_shape_fn((2, 3, 2, 2), |(t, _, _, _)| (t + 1) as f64).into_dyn();
    let delta = arr1(&[10.0, 20.0, 30.0]).into_dyn();

    let result = integrate(integrand.view(), delta.view(), -3)?;
    assert_eq!(result.shape(), &[2, 2, 2]);
    assert_eq!(result[[0, 1, 1]], 60.0);
    assert_eq!(result[[1, 0, 0]], 120.0);

    // Full-shape delta broadcast under the leading time axis
    let delta_3d = Array3::from_elem((3, 2, 2), 5.0).into_dyn();
    let result = integrate(integrand.view(), delta_3d.view(), 1)?;
    assert_eq!(result[[1, 0, 0]], 30.0);

    assert!(integrate(integrand.view(), delta.view(), 4).is_err());
    Ok(())
}

#[test]
fn test_integrate_constant_integrand() -> Result<()> {
    let integrand = arr0(2.0).into_dyn();
    let delta = arr1(&[1.0, 2.0, 3.0]).into_dyn();

    let result = integrate(integrand.view(), delta.view(), -3)?;
    assert_eq!(result.ndim(), 0);
    assert_eq!(result.sum(), 12.0);
    Ok(())
}

#[test]
fn test_integrate_skips_masked_layers() -> Result<()> {
    let integrand = arr1(&[1.0, 1.0, 1.0]).into_dyn();
    let delta = arr1(&[f64::NAN, 2.0, 3.0]).into_dyn();
    let result = integrate(integrand.view(), delta.view(), 0)?;
    assert_eq!(result.sum(), 5.0);

    let all_masked = ArrayD::from_elem(IxDyn(&[3, 2]), f64::NAN);
    let sums = masked_sum_axis(&all_masked.view(), Axis(0));
    assert_eq!(sums.shape(), &[2]);
    assert!(sums.iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn test_int_dp_g_normalises_thickness_units() -> Result<()> {
    let integrand = arr1(&[1.0, 1.0]).into_dyn();

    // hPa-sized thicknesses are converted to Pa first
    let dp_hpa = arr1(&[100.0, 200.0]).into_dyn();
    let result = int_dp_g(integrand.view(), dp_hpa.view(), 0)?;
    assert_relative_eq!(result.sum(), 30_000.0 / GRAV, max_relative = 1e-12);
    assert_eq!(dp_hpa[[0]], 100.0);

    // Above the thickness threshold the values are already Pa
    let dp_pa = arr1(&[500.0, 600.0]).into_dyn();
    let result = int_dp_g(integrand.view(), dp_pa.view(), 0)?;
    assert_relative_eq!(result.sum(), 1_100.0 / GRAV, max_relative = 1e-12);
    Ok(())
}
