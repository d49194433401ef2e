//! Half-level / full-level averaging and differencing
//!
//! The data need not be pressure: anything defined at layer interfaces can be
//! averaged to layer centres and vice versa.

use super::{check_axis, require_levels};
use crate::errors::Result;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Slice};

/// Default vertical axis for level-dimensioned data: a 4-D array is taken
/// to be `(time, lev, lat, lon)`, anything else to have the vertical first.
#[must_use]
pub fn default_vertical_axis(ndim: usize) -> Axis {
    if ndim == 4 {
        Axis(1)
    } else {
        Axis(0)
    }
}

/// Values at full levels from values at the bounding half-levels.
///
/// Full level `k` is `0.5 * (phalf[k] + phalf[k + 1])` along `axis`.
///
/// # Errors
///
/// Returns an error if `axis` is out of bounds or has fewer than two points.
pub fn pfull_from_phalf(phalf: ArrayViewD<'_, f64>, axis: Axis) -> Result<ArrayD<f64>> {
    check_axis(phalf.ndim(), axis)?;
    require_levels(phalf.len_of(axis), 2)?;

    let lower = phalf.slice_axis(axis, Slice::new(0, Some(-1), 1));
    let upper = phalf.slice_axis(axis, Slice::new(1, None, 1));
    Ok((&lower + &upper) * 0.5)
}

/// Values at half-levels from full-level values and boundary conditions.
///
/// Interior half-levels are the mean of the adjacent full levels; the first
/// half-level is set to `val_toa` and the last to `val_sfc`. The result has
/// one more point than `pfull` along `axis`.
///
/// # Errors
///
/// Returns an error if `axis` is out of bounds or empty.
pub fn phalf_from_pfull(
    pfull: ArrayViewD<'_, f64>,
    axis: Axis,
    val_toa: f64,
    val_sfc: f64,
) -> Result<ArrayD<f64>> {
    check_axis(pfull.ndim(), axis)?;
    let nfull = pfull.len_of(axis);
    require_levels(nfull, 1)?;

    let mut shape = pfull.shape().to_vec();
    shape[axis.index()] = nfull + 1;

    let mut phalf = ArrayD::zeros(IxDyn(&shape));
    phalf.index_axis_mut(axis, 0).fill(val_toa);
    phalf.index_axis_mut(axis, nfull).fill(val_sfc);

    if nfull > 1 {
        // Interior interfaces are full-level midpoints: the same averaging
        // as going half -> full.
        let interior = pfull_from_phalf(pfull, axis)?;
        phalf
            .slice_axis_mut(axis, Slice::new(1, Some(nfull as isize), 1))
            .assign(&interior);
    }

    Ok(phalf)
}

/// Layer thickness from pressure at the bounding half-levels.
///
/// Signed difference `phalf[k + 1] - phalf[k]` along `axis`, which is
/// positive for half-levels ordered from the top of the atmosphere down.
///
/// # Errors
///
/// Returns an error if `axis` is out of bounds or has fewer than two points.
pub fn dp_from_phalf(phalf: ArrayViewD<'_, f64>, axis: Axis) -> Result<ArrayD<f64>> {
    check_axis(phalf.ndim(), axis)?;
    require_levels(phalf.len_of(axis), 2)?;

    let lower = phalf.slice_axis(axis, Slice::new(0, Some(-1), 1));
    let upper = phalf.slice_axis(axis, Slice::new(1, None, 1));
    Ok(&upper - &lower)
}
