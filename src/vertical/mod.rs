//! Vertical coordinate conversions
//!
//! This module converts between the representations of an atmospheric column
//! that model output comes in:
//!
//! - *half-levels* (`phalf`): pressure at layer interfaces, one more point
//!   than there are layers
//! - *full-levels* (`pfull`): values at layer centres
//! - *layer thickness* (`dp`): pressure difference across each layer
//!
//! # Organization
//!
//! - [`levels`]: half/full-level averaging and differencing along any axis
//! - [`sigma`]: half-level pressure from hybrid sigma-pressure coefficients
//! - [`thickness`]: thickness of pressure-level data, with and without
//!   surface clipping
//! - [`labeled`]: the same conversions on [`LabeledArray`](crate::labeled::LabeledArray)s
//!
//! # Axis conventions
//!
//! Routines that build a vertical axis from a surface field insert it in
//! front of the two horizontal dimensions: a `(lat, lon)` surface pressure
//! yields `(lev, lat, lon)`, a `(time, lat, lon)` one yields
//! `(time, lev, lat, lon)`, and a 0-D surface pressure yields a single
//! column `(lev)`.

pub mod labeled;
pub mod levels;
pub mod sigma;
pub mod thickness;

pub use labeled::{
    dp_from_p_labeled, dp_from_phalf_labeled, dp_from_sigma_labeled,
    level_thickness_labeled, pfull_from_phalf_labeled, pfull_from_sigma_labeled,
    phalf_from_sigma_labeled, vert_coord_name,
};
pub use levels::{default_vertical_axis, dp_from_phalf, pfull_from_phalf, phalf_from_pfull};
pub use sigma::{
    dp_from_ps, dp_from_ps as dp_from_sigma, pfull_from_ps, pfull_from_ps as pfull_from_sigma,
    phalf_from_ps, phalf_from_ps as phalf_from_sigma, surface_vertical_axis,
};
pub use thickness::{dp_from_p, level_thickness};

use crate::errors::{AtmosVertError, Result};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

/// Fails unless `axis` indexes into an array of `ndim` dimensions.
pub(crate) fn check_axis(ndim: usize, axis: Axis) -> Result<()> {
    if axis.index() >= ndim {
        return Err(AtmosVertError::InvalidAxis {
            axis: axis.index() as isize,
            ndim,
        });
    }
    Ok(())
}

/// Fails unless the vertical axis has at least `required` points.
pub(crate) fn require_levels(found: usize, required: usize) -> Result<()> {
    if found < required {
        return Err(AtmosVertError::TooFewLevels { required, found });
    }
    Ok(())
}

/// Builds an array shaped like `surface` with `nlev` levels inserted at
/// `axis`, filling level `k` elementwise from `f(k, surface_value)`.
pub(crate) fn stack_levels<F>(
    surface: &ArrayViewD<'_, f64>,
    axis: Axis,
    nlev: usize,
    mut f: F,
) -> ArrayD<f64>
where
    F: FnMut(usize, f64) -> f64,
{
    let mut shape = surface.shape().to_vec();
    shape.insert(axis.index(), nlev);

    let mut out = ArrayD::zeros(IxDyn(&shape));
    for (k, mut level) in out.axis_iter_mut(axis).enumerate() {
        level.zip_mut_with(surface, |o, &s| *o = f(k, s));
    }
    out
}
