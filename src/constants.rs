//! Physical constants and conventional coordinate names

/// Gravitational acceleration at the Earth's surface (m s^-2)
pub const GRAV: f64 = 9.81;

/// Name of the half-level (layer interface) vertical dimension
pub const PHALF_STR: &str = "phalf";

/// Name of the full-level (layer centre) vertical dimension
pub const PFULL_STR: &str = "pfull";

/// Name of the pressure-level vertical dimension
pub const PLEVEL_STR: &str = "level";

/// Vertical coordinate names checked, in order, by `vert_coord_name`
pub const VERT_COORD_NAMES: [&str; 2] = [PLEVEL_STR, PFULL_STR];

/// Pressure fields whose largest magnitude is below this are taken to be hPa
pub const HPA_THRESHOLD: f64 = 1200.0;

/// Same as [`HPA_THRESHOLD`] but for layer-thickness fields
pub const HPA_THICKNESS_THRESHOLD: f64 = 400.0;

/// Angular fields whose largest magnitude exceeds this are taken to be degrees
pub const DEGREES_THRESHOLD: f64 = 4.0 * std::f64::consts::PI;

/// Pa per hPa
pub const PA_PER_HPA: f64 = 100.0;

/// Lower edge of the bottom layer in `dp_from_p` (Pa)
pub const P_BOTTOM_EDGE: f64 = 1.1e5;

/// Upper edge of the top layer (Pa)
pub const P_TOP_EDGE: f64 = 0.0;

/// Value used to mark invalid (masked) array elements
pub const MASKED: f64 = f64::NAN;
