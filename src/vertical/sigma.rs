//! Hybrid sigma-pressure coordinates
//!
//! Half-level pressure is `pk + bk * ps`, with `bk` and `pk` ordered from the
//! top of the atmosphere (where both are usually zero) down to the surface
//! (where `bk = 1`, `pk = 0`). Inputs are taken to be in Pa.

use super::{levels, stack_levels};
use crate::errors::{AtmosVertError, Result};
use ndarray::{ArrayD, ArrayView1, ArrayViewD, Axis};
use tracing::debug;

/// Position of the vertical axis created from a surface field of `ndim`
/// dimensions: `(lat, lon)` and 0-D fields get it first, `(time, lat, lon)`
/// fields get it second.
///
/// # Errors
///
/// Returns [`AtmosVertError::DimensionMismatch`] for any other dimensionality.
pub fn surface_vertical_axis(ndim: usize) -> Result<Axis> {
    match ndim {
        0 | 2 => Ok(Axis(0)),
        3 => Ok(Axis(1)),
        found => Err(AtmosVertError::DimensionMismatch {
            expected: "0, 2 or 3 (surface field)".to_string(),
            found,
        }),
    }
}

/// Pressure at half-levels from sigma coefficients and surface pressure.
///
/// `bk` and `pk` include both the top-of-atmosphere and surface interfaces,
/// so the result has one more level than there are sigma layers.
///
/// # Errors
///
/// Returns an error if `bk` and `pk` differ in length or `ps` is not a 0-D,
/// 2-D or 3-D field.
pub fn phalf_from_ps(
    bk: ArrayView1<'_, f64>,
    pk: ArrayView1<'_, f64>,
    ps: ArrayViewD<'_, f64>,
) -> Result<ArrayD<f64>> {
    if bk.len() != pk.len() {
        return Err(AtmosVertError::ShapeMismatch {
            message: format!(
                "bk has {} levels but pk has {}",
                bk.len(),
                pk.len()
            ),
        });
    }
    let axis = surface_vertical_axis(ps.ndim())?;
    debug!(levels = bk.len(), axis = axis.index(), "building half-level pressure");

    Ok(stack_levels(&ps, axis, bk.len(), |k, surface| {
        pk[k] + bk[k] * surface
    }))
}

/// Pressure at full levels from sigma coefficients and surface pressure.
///
/// # Errors
///
/// Same conditions as [`phalf_from_ps`], plus fewer than two half-levels.
pub fn pfull_from_ps(
    bk: ArrayView1<'_, f64>,
    pk: ArrayView1<'_, f64>,
    ps: ArrayViewD<'_, f64>,
) -> Result<ArrayD<f64>> {
    let axis = surface_vertical_axis(ps.ndim())?;
    let phalf = phalf_from_ps(bk, pk, ps)?;
    levels::pfull_from_phalf(phalf.view(), axis)
}

/// Pressure thickness of each sigma layer.
///
/// # Errors
///
/// Same conditions as [`phalf_from_ps`], plus fewer than two half-levels.
pub fn dp_from_ps(
    bk: ArrayView1<'_, f64>,
    pk: ArrayView1<'_, f64>,
    ps: ArrayViewD<'_, f64>,
) -> Result<ArrayD<f64>> {
    let axis = surface_vertical_axis(ps.ndim())?;
    let phalf = phalf_from_ps(bk, pk, ps)?;
    levels::dp_from_phalf(phalf.view(), axis)
}
