//! atmos_vert: vertical coordinates for atmospheric gridded data
//!
//! A Rust library for moving atmospheric model output between vertical
//! representations and integrating it through the column. atmos_vert converts
//! between pressure at layer interfaces (half-levels) and layer centres
//! (full-levels), derives layer thicknesses from hybrid sigma-pressure
//! coefficients or from pressure-level data, and computes mass-weighted
//! column integrals.
//!
//! ## Key Features
//!
//! - **Sigma coordinates**: half-level, full-level and thickness fields from `bk`, `pk` and surface pressure
//! - **Pressure levels**: layer thickness with the bottom layer clipped at the surface and underground levels masked
//! - **Integration**: `sum(x * dp) / g` along a positional or named vertical axis
//! - **Unit detection**: Pa/hPa and degree/radian heuristics with logged conversions
//! - **Labeled arrays**: named dimensions and coordinates for `phalf`/`pfull`/`level` data
//! - **User data**: attribute inheritance through object hierarchies and a typed registry of regions, calculations, variables and projects
//!
//! ## Module Organization
//!
//! - [`vertical`]: half/full-level and thickness conversions
//! - [`integrate`]: weighted vertical integration
//! - [`units`]: unit normalisation
//! - [`labeled`]: arrays with named dimensions
//! - [`inherit`]: attribute lookup through ancestors
//! - [`registry`]: name-keyed collections and user data
//! - [`constants`]: physical constants and coordinate names
//! - [`errors`]: centralized error handling
//!
//! ## Usage Examples
//!
//! ### Column mass from pressure levels
//! ```rust
//! use atmos_vert::prelude::*;
//! use ndarray::{arr0, arr1};
//!
//! let levels = arr1(&[1000.0, 850.0, 500.0, 200.0]); // hPa
//! let ps = arr0(1013.25).into_dyn(); // hPa
//!
//! let dp = dp_from_p(levels.view(), ps.view()).unwrap();
//! assert_eq!(dp.shape(), &[4]);
//!
//! // Mass of the column, kg m^-2
//! let ones = ndarray::ArrayD::<f64>::ones(dp.raw_dim());
//! let mass = int_dp_g(ones.view(), dp.view(), 0).unwrap();
//! assert!((mass.sum() - 101_325.0 / GRAV).abs() < 1e-6);
//! ```
//!
//! ### Sigma coordinates
//! ```rust
//! use atmos_vert::prelude::*;
//! use ndarray::{arr1, Array2};
//!
//! let bk = arr1(&[0.0, 0.5, 1.0]);
//! let pk = arr1(&[0.0, 5000.0, 0.0]);
//! let ps = Array2::<f64>::from_elem((2, 3), 100_000.0).into_dyn();
//!
//! let phalf = phalf_from_ps(bk.view(), pk.view(), ps.view()).unwrap();
//! assert_eq!(phalf.shape(), &[3, 2, 3]);
//!
//! let dp = dp_from_ps(bk.view(), pk.view(), ps.view()).unwrap();
//! assert_eq!(dp.shape(), &[2, 2, 3]);
//! ```

// Core modules
pub mod constants;
pub mod errors;
pub mod inherit;
pub mod integrate;
pub mod labeled;
pub mod registry;
pub mod units;
pub mod vertical;

// Direct re-exports for the public API
pub use constants::*;
pub use errors::*;
pub use inherit::*;
pub use integrate::*;
pub use labeled::*;
pub use registry::*;
pub use units::*;
pub use vertical::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::constants::{GRAV, PFULL_STR, PHALF_STR, PLEVEL_STR};
    pub use crate::errors::{AtmosVertError, Result};
    pub use crate::inherit::{get_parent_attr, AttrValue, Inherit, Node, Relation};
    pub use crate::integrate::{int_dp_g, int_dp_g_labeled, integrate, integrate_labeled};
    pub use crate::labeled::LabeledArray;
    pub use crate::registry::{dict_name_keys, load_user_data, Named, UserData, UserDataRegistry, UserModule};
    pub use crate::units::{to_hpa, to_pascal, to_radians, PressureField};
    pub use crate::vertical::{
        dp_from_p, dp_from_phalf, dp_from_ps, dp_from_sigma, level_thickness, pfull_from_phalf,
        pfull_from_ps, pfull_from_sigma, phalf_from_pfull, phalf_from_ps, phalf_from_sigma,
    };
}
