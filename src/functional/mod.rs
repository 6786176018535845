//! functional — functional-coefficient autoregressive estimation.
//!
//! Purpose
//! -------
//! The estimation half of the crate: validated data containers and grids
//! ([`core`]), kernel-weighted local point estimators behind one trait
//! ([`estimators`]), the user-facing fit façades ([`models`]), and the
//! error vocabulary shared by all of them ([`errors`]).
//!
//! Key behaviors
//! -------------
//! - Single series: [`models::FarModel`] estimates autoregressive
//!   coefficients as functions of a lagged reference signal on a
//!   quantile-bounded grid.
//! - Panels: [`models::MxfarModel`] stacks all subjects into one local
//!   solve and decomposes coefficients into group means plus subject
//!   deviations.
//! - Failures at individual grid points are contained as missing cells;
//!   only malformed inputs abort a fit.
//!
//! Downstream usage
//! ----------------
//! - `evaluation::ape` and `statistical_tests::nonlinearity` build on the
//!   single-series path; `spectral::fpdc` consumes the estimated fields.

pub mod core;
pub mod errors;
pub mod estimators;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CoefficientField, FarData, FarOptions, FarShape, MixedCoefficientField, MixedCoefficients,
    PanelData, SignalGrid,
};
pub use self::errors::{FarError, FarResult};
pub use self::models::{FarFit, FarModel, MxfarFit, MxfarModel};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{FarError, FarResult};
    pub use super::estimators::prelude::*;
    pub use super::models::prelude::*;
}
