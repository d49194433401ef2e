//! Heuristic unit detection and in-place conversion
//!
//! Gridded model output arrives in a mix of conventions: pressure in Pa or
//! hPa, angles in degrees or radians. These functions guess the unit from the
//! largest finite magnitude in the array and convert in place when the guess
//! says the array is in the "wrong" unit. A conversion is reported through
//! `tracing::warn!` and never as an error.

use crate::constants::{
    DEGREES_THRESHOLD, HPA_THICKNESS_THRESHOLD, HPA_THRESHOLD, PA_PER_HPA,
};
use ndarray::{ArrayBase, Data, DataMut, Dimension};
use tracing::warn;

/// Kind of pressure field being normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureField {
    /// Pressure values at levels (surface pressure, level centres, half-levels)
    Level,
    /// Pressure differences across layers
    Thickness,
}

impl PressureField {
    /// Largest magnitude still interpreted as hPa
    #[must_use]
    pub const fn hpa_threshold(self) -> f64 {
        match self {
            Self::Level => HPA_THRESHOLD,
            Self::Thickness => HPA_THICKNESS_THRESHOLD,
        }
    }
}

/// Largest absolute finite value in the array, `None` if there is none.
pub fn max_abs<S, D>(field: &ArrayBase<S, D>) -> Option<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    field
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

/// Converts a pressure field from hPa to Pa in place if it looks like hPa.
///
/// Returns `true` when a conversion was applied. Applying it a second time is
/// a no-op, since the converted magnitudes clear the threshold.
///
/// For thickness fields already in Pa the heuristic fails when the thickest
/// layer is under 4 hPa, which only happens for very finely resolved model
/// levels.
pub fn to_pascal<S, D>(field: &mut ArrayBase<S, D>, kind: PressureField) -> bool
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    match max_abs(field) {
        Some(max) if max < kind.hpa_threshold() => {
            warn!(max, ?kind, "pressure field looks like hPa, converting to Pa");
            field.mapv_inplace(|v| v * PA_PER_HPA);
            true
        }
        _ => false,
    }
}

/// Converts a pressure field from Pa to hPa in place if it looks like Pa.
pub fn to_hpa<S, D>(field: &mut ArrayBase<S, D>) -> bool
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    match max_abs(field) {
        Some(max) if max > HPA_THRESHOLD => {
            warn!(max, "pressure field looks like Pa, converting to hPa");
            field.mapv_inplace(|v| v / PA_PER_HPA);
            true
        }
        _ => false,
    }
}

/// Converts an angular field from degrees to radians in place if any
/// magnitude exceeds 4π.
pub fn to_radians<S, D>(field: &mut ArrayBase<S, D>) -> bool
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    match max_abs(field) {
        Some(max) if max > DEGREES_THRESHOLD => {
            warn!(max, "angular field looks like degrees, converting to radians");
            field.mapv_inplace(f64::to_radians);
            true
        }
        _ => false,
    }
}
