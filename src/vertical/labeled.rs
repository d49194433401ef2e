//! Vertical conversions on labeled arrays
//!
//! These wrap the positional routines, locating the vertical axis by name
//! and relabelling it: half-level data lives on `phalf`, full-level data on
//! `pfull`, pressure-level data on `level`.

use super::{levels, sigma, surface_vertical_axis, thickness};
use crate::constants::{PA_PER_HPA, PFULL_STR, PHALF_STR, PLEVEL_STR, VERT_COORD_NAMES};
use crate::errors::{AtmosVertError, Result};
use crate::labeled::LabeledArray;
use crate::units::{to_pascal, PressureField};
use ndarray::{s, Array1, ArrayD, ArrayView1, Axis, Ix1};

/// View of a 1-D labeled array whose single dimension must be `dim`.
fn one_dim<'a>(arr: &'a LabeledArray, dim: &str) -> Result<ArrayView1<'a, f64>> {
    arr.axis_of(dim)?;
    if arr.ndim() != 1 {
        return Err(AtmosVertError::DimensionMismatch {
            expected: format!("1 ('{dim}')"),
            found: arr.ndim(),
        });
    }
    Ok(arr.data().view().into_dimensionality::<Ix1>()?)
}

fn midpoints(values: &Array1<f64>) -> Array1<f64> {
    (&values.slice(s![..-1]) + &values.slice(s![1..])) * 0.5
}

/// Wrap `data` built from the surface field `ps` with a new vertical
/// dimension `dim` at `axis`, keeping the coordinates of `ps`.
fn insert_vertical(
    ps: &LabeledArray,
    axis: Axis,
    dim: &str,
    data: ArrayD<f64>,
    coord: Option<Array1<f64>>,
) -> Result<LabeledArray> {
    let mut dims = ps.dims().to_vec();
    dims.insert(axis.index(), dim.to_string());

    let mut out = LabeledArray::new(data, dims)?;
    for (name, values) in ps.coords() {
        out = out.with_coord(name, values.clone())?;
    }
    match coord {
        Some(values) => out.with_coord(dim, values),
        None => Ok(out),
    }
}

/// Half-level pressure on a `phalf` dimension.
///
/// `bk` and `pk` must be 1-D along `phalf`; a `phalf` coordinate on `bk`
/// is carried over to the result.
///
/// # Errors
///
/// Returns an error if `bk`/`pk` are not 1-D `phalf` arrays of equal length
/// or `ps` has an unsupported dimensionality.
pub fn phalf_from_sigma_labeled(
    bk: &LabeledArray,
    pk: &LabeledArray,
    ps: &LabeledArray,
) -> Result<LabeledArray> {
    let axis = surface_vertical_axis(ps.ndim())?;
    let data = sigma::phalf_from_ps(one_dim(bk, PHALF_STR)?, one_dim(pk, PHALF_STR)?, ps.data().view())?;
    insert_vertical(ps, axis, PHALF_STR, data, bk.coord(PHALF_STR).cloned())
}

/// Full-level values on a `pfull` dimension from values on `phalf`.
///
/// Without an explicit `pfull_coord` the midpoints of the `phalf`
/// coordinate (if any) are used.
///
/// # Errors
///
/// Returns an error if `phalf` has no `phalf` dimension, it is shorter than
/// two points, or `pfull_coord` has the wrong length.
pub fn pfull_from_phalf_labeled(
    phalf: &LabeledArray,
    pfull_coord: Option<Array1<f64>>,
) -> Result<LabeledArray> {
    let axis = phalf.axis_of(PHALF_STR)?;
    let data = levels::pfull_from_phalf(phalf.data().view(), axis)?;
    let coord = pfull_coord.or_else(|| phalf.coord(PHALF_STR).map(midpoints));
    phalf.with_vertical(PHALF_STR, data, PFULL_STR, coord)
}

/// Layer thickness on a `pfull` dimension from half-level pressure.
///
/// # Errors
///
/// Same conditions as [`pfull_from_phalf_labeled`].
pub fn dp_from_phalf_labeled(
    phalf: &LabeledArray,
    pfull_coord: Option<Array1<f64>>,
) -> Result<LabeledArray> {
    let axis = phalf.axis_of(PHALF_STR)?;
    let data = levels::dp_from_phalf(phalf.data().view(), axis)?;
    let coord = pfull_coord.or_else(|| phalf.coord(PHALF_STR).map(midpoints));
    phalf.with_vertical(PHALF_STR, data, PFULL_STR, coord)
}

pub fn pfull_from_sigma_labeled(
    bk: &LabeledArray,
    pk: &LabeledArray,
    ps: &LabeledArray,
    pfull_coord: Option<Array1<f64>>,
) -> Result<LabeledArray> {
    pfull_from_phalf_labeled(&phalf_from_sigma_labeled(bk, pk, ps)?, pfull_coord)
}

pub fn dp_from_sigma_labeled(
    bk: &LabeledArray,
    pk: &LabeledArray,
    ps: &LabeledArray,
    pfull_coord: Option<Array1<f64>>,
) -> Result<LabeledArray> {
    dp_from_phalf_labeled(&phalf_from_sigma_labeled(bk, pk, ps)?, pfull_coord)
}

/// [`level_thickness`](thickness::level_thickness) on a `level` dimension
/// whose coordinate is the input pressure in hPa.
///
/// # Errors
///
/// Returns an error for fewer than two levels.
pub fn level_thickness_labeled(p: ArrayView1<'_, f64>) -> Result<LabeledArray> {
    let mut p_pa = p.to_owned();
    to_pascal(&mut p_pa, PressureField::Level);

    let dp = thickness::level_thickness(p_pa.view())?;
    let levels_hpa = p_pa.mapv(|v| v / PA_PER_HPA);
    LabeledArray::new(dp.into_dyn(), [PLEVEL_STR])?.with_coord(PLEVEL_STR, levels_hpa)
}

/// [`dp_from_p`](thickness::dp_from_p) on labeled arrays.
///
/// `p` is 1-D; its dimension name becomes the vertical dimension of the
/// result, and its coordinate (or, lacking one, its values) the vertical
/// coordinate.
///
/// # Errors
///
/// Returns an error if `p` is not 1-D or `ps` has an unsupported
/// dimensionality.
pub fn dp_from_p_labeled(p: &LabeledArray, ps: &LabeledArray) -> Result<LabeledArray> {
    if p.ndim() != 1 {
        return Err(AtmosVertError::DimensionMismatch {
            expected: "1 (pressure levels)".to_string(),
            found: p.ndim(),
        });
    }
    let dim = p.dims()[0].clone();
    let levels = one_dim(p, &dim)?;

    let axis = surface_vertical_axis(ps.ndim())?;
    let data = thickness::dp_from_p(levels, ps.data().view())?;
    let coord = p
        .coord(&dim)
        .cloned()
        .unwrap_or_else(|| levels.to_owned());
    insert_vertical(ps, axis, &dim, data, Some(coord))
}

/// Name of the vertical coordinate of `arr`, checking `level` then `pfull`.
#[must_use]
pub fn vert_coord_name(arr: &LabeledArray) -> Option<&'static str> {
    VERT_COORD_NAMES
        .iter()
        .copied()
        .find(|name| arr.has_coord(name))
}
