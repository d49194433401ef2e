//! Layer thickness of data on pressure levels
//!
//! Pressure-level data carries level centres only, so layer edges have to be
//! invented. Both routines put interior edges halfway between neighbouring
//! levels and let the top layer extend to 0 Pa; they differ at the bottom.

use super::{require_levels, stack_levels, surface_vertical_axis};
use crate::constants::{MASKED, P_BOTTOM_EDGE, P_TOP_EDGE};
use crate::errors::Result;
use crate::units::{to_pascal, PressureField};
use ndarray::{Array1, ArrayD, ArrayView1, ArrayViewD, Axis};
use tracing::debug;

/// Thickness, in Pa, of each pressure level.
///
/// `p` may be ordered either way, in Pa or hPa. The highest pressure is
/// treated as the bottom boundary rather than a layer centre, so the bottom
/// layer runs from it to halfway to the next level; the top layer runs from
/// halfway between the top two levels up to 0 Pa. The thicknesses sum to the
/// bottom pressure and come back in the same order as `p`.
///
/// # Errors
///
/// Returns [`TooFewLevels`](crate::errors::AtmosVertError::TooFewLevels)
/// for fewer than two levels.
pub fn level_thickness(p: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    let n = p.len();
    require_levels(n, 2)?;

    let mut p = p.to_owned();
    to_pascal(&mut p, PressureField::Level);

    let ascending = p[0] < p[n - 1];
    if ascending {
        p.invert_axis(Axis(0));
    }

    let mut dp = Array1::zeros(n);
    dp[0] = 0.5 * (p[0] - p[1]);
    for k in 1..n - 1 {
        dp[k] = 0.5 * (p[k - 1] - p[k + 1]);
    }
    dp[n - 1] = 0.5 * (p[n - 2] + p[n - 1]);

    if ascending {
        dp.invert_axis(Axis(0));
    }
    Ok(dp)
}

/// Thickness, in Pa, of pressure levels clipped at the surface.
///
/// Edges sit halfway between levels, with the bottom edge fixed at 1100 hPa
/// and the top edge at 0 Pa. Where the surface pressure is above a layer's
/// lower edge the layer is cut off at the surface, and levels whose nominal
/// pressure exceeds the surface pressure lie underground and are masked
/// (NaN).
///
/// `p` may be ordered either way and given in Pa or hPa, as may `ps`. The
/// result has the vertical axis inserted into `ps`'s shape (see
/// [`surface_vertical_axis`]) with levels in the same order as `p`.
///
/// # Errors
///
/// Returns an error if `p` is empty or `ps` has an unsupported
/// dimensionality.
pub fn dp_from_p(p: ArrayView1<'_, f64>, ps: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>> {
    let n = p.len();
    require_levels(n, 1)?;
    let axis = surface_vertical_axis(ps.ndim())?;

    let mut p = p.to_owned();
    to_pascal(&mut p, PressureField::Level);
    let mut ps = ps.to_owned();
    to_pascal(&mut ps, PressureField::Level);

    // Work bottom-up, flip back at the end
    let ascending = n > 1 && p[0] < p[n - 1];
    if ascending {
        p.invert_axis(Axis(0));
    }
    debug!(levels = n, ascending, "computing surface-clipped layer thickness");

    let mut edges = Vec::with_capacity(n + 1);
    edges.push(P_BOTTOM_EDGE);
    edges.extend(p.windows(2).into_iter().map(|w| 0.5 * (w[0] + w[1])));
    edges.push(P_TOP_EDGE);

    let mut dp = stack_levels(&ps.view(), axis, n, |k, surface| {
        let (below, above) = (edges[k], edges[k + 1]);
        if surface < p[k] {
            MASKED
        } else if surface > below {
            below - above
        } else {
            surface - above
        }
    });

    if ascending {
        dp.invert_axis(axis);
    }
    Ok(dp)
}
