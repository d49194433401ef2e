//! Weighted vertical integration
//!
//! Integrals are sums of `integrand * delta` along the vertical axis. Masked
//! (non-finite) products are left out of the sum; a column with nothing but
//! masked values integrates to NaN.

use crate::constants::{GRAV, MASKED};
use crate::errors::{AtmosVertError, Result};
use crate::labeled::LabeledArray;
use crate::units::{to_pascal, PressureField};
use ndarray::{Array1, ArrayD, ArrayViewD, Axis, IxDyn};

/// Pressure is the third-to-last axis of `(time, lev, lat, lon)` and
/// `(lev, lat, lon)` data alike.
pub const DEFAULT_VERTICAL_AXIS: isize = -3;

/// Resolve a possibly negative axis index against `ndim` dimensions.
///
/// # Errors
///
/// Returns [`AtmosVertError::InvalidAxis`] if the index is out of range.
pub fn resolve_axis(axis: isize, ndim: usize) -> Result<Axis> {
    let resolved = if axis < 0 { axis + ndim as isize } else { axis };
    if resolved < 0 || resolved as usize >= ndim {
        return Err(AtmosVertError::InvalidAxis { axis, ndim });
    }
    Ok(Axis(resolved as usize))
}

/// Sum along `axis`, skipping non-finite values.
#[must_use]
pub fn masked_sum_axis(data: &ArrayViewD<'_, f64>, axis: Axis) -> ArrayD<f64> {
    data.map_axis(axis, |lane| {
        let mut sum = 0.0_f64;
        let mut count = 0_usize;
        for &x in lane.iter() {
            if x.is_finite() {
                sum += x;
                count += 1;
            }
        }
        if count > 0 {
            sum
        } else {
            MASKED
        }
    })
}

/// Weight `integrand` by `delta`, usually ahead of integration along `axis`.
///
/// A 1-D `delta` with one value per point along `axis` is laid along that
/// axis. Otherwise `delta` must broadcast against `integrand` directly, e.g.
/// a `(lev, lat, lon)` thickness under a `(time, lev, lat, lon)` integrand.
///
/// # Errors
///
/// Returns [`AtmosVertError::ShapeMismatch`] if neither applies.
pub fn weight_by_delta(
    integrand: ArrayViewD<'_, f64>,
    delta: ArrayViewD<'_, f64>,
    axis: Axis,
) -> Result<ArrayD<f64>> {
    if delta.ndim() == 1
        && axis.index() < integrand.ndim()
        && delta.len() == integrand.len_of(axis)
    {
        let mut shape = vec![1; integrand.ndim()];
        shape[axis.index()] = delta.len();
        let column = delta
            .iter()
            .copied()
            .collect::<Array1<f64>>()
            .into_shape(IxDyn(&shape))?;
        if let Some(weights) = column.broadcast(integrand.shape()) {
            return Ok(&integrand * &weights);
        }
    }

    if let Some(weights) = delta.broadcast(integrand.shape()) {
        return Ok(&integrand * &weights);
    }

    Err(AtmosVertError::ShapeMismatch {
        message: format!(
            "cannot weight integrand of shape {:?} by delta of shape {:?}",
            integrand.shape(),
            delta.shape()
        ),
    })
}

/// Integrate `integrand` along `axis` using the layer widths in `delta`.
///
/// Negative axes count from the end. A 0-D integrand is a constant: the
/// result is then the sum of `delta` scaled by it along delta's first axis.
///
/// # Errors
///
/// Returns an error if the axis is out of range or `delta` cannot be laid
/// against `integrand`.
pub fn integrate(
    integrand: ArrayViewD<'_, f64>,
    delta: ArrayViewD<'_, f64>,
    axis: isize,
) -> Result<ArrayD<f64>> {
    if integrand.ndim() == 0 {
        let scale = integrand.iter().next().copied().unwrap_or(MASKED);
        let product = delta.mapv(|d| d * scale);
        if product.ndim() == 0 {
            return Ok(product);
        }
        return Ok(masked_sum_axis(&product.view(), Axis(0)));
    }

    let axis = resolve_axis(axis, integrand.ndim())?;
    let product = weight_by_delta(integrand, delta, axis)?;
    Ok(masked_sum_axis(&product.view(), axis))
}

/// Mass-weighted vertical integral: `sum(integrand * dp) / g`.
///
/// `dp` may be in Pa or hPa; a copy is normalised to Pa first.
///
/// # Errors
///
/// Same conditions as [`integrate`].
pub fn int_dp_g(
    integrand: ArrayViewD<'_, f64>,
    dp: ArrayViewD<'_, f64>,
    axis: isize,
) -> Result<ArrayD<f64>> {
    let mut dp = dp.to_owned();
    to_pascal(&mut dp, PressureField::Thickness);
    Ok(integrate(integrand, dp.view(), axis)? / GRAV)
}

/// [`integrate`] over the named dimension `dim`, lining `delta` up with
/// `integrand` by dimension name.
///
/// # Errors
///
/// Returns an error if `dim` is missing from `integrand`, `delta` has a
/// dimension the integrand lacks, or both carry a coordinate for the same
/// dimension with different values.
pub fn integrate_labeled(
    integrand: &LabeledArray,
    delta: &LabeledArray,
    dim: &str,
) -> Result<LabeledArray> {
    let axis = integrand.axis_of(dim)?;
    for (name, values) in delta.coords() {
        if let Some(own) = integrand.coord(name) {
            if own != values {
                return Err(AtmosVertError::ShapeMismatch {
                    message: format!("coordinate '{name}' differs between integrand and delta"),
                });
            }
        }
    }
    let weights = delta.broadcast_to(integrand.dims(), integrand.shape())?;
    let product = integrand.data() * &weights;
    integrand.reduced(dim, masked_sum_axis(&product.view(), axis))
}

/// [`int_dp_g`] over the named dimension `dim`.
///
/// # Errors
///
/// Same conditions as [`integrate_labeled`].
pub fn int_dp_g_labeled(
    integrand: &LabeledArray,
    dp: &LabeledArray,
    dim: &str,
) -> Result<LabeledArray> {
    let mut dp = dp.clone();
    to_pascal(dp.data_mut(), PressureField::Thickness);

    let mut out = integrate_labeled(integrand, &dp, dim)?;
    out.data_mut().mapv_inplace(|v| v / GRAV);
    Ok(out)
}
