//! functional::models — fit orchestration façades.
//!
//! Purpose
//! -------
//! House the two user-facing model types: [`FarModel`] for one series and
//! [`MxfarModel`] for a grouped panel. Both validate their inputs, build
//! the grid and lagged design, inject the matching point estimator into the
//! parallel grid sweep, and package the results with aligned in-sample
//! fitted values and residuals (and, on request, functional PDC arrays).
//!
//! Downstream usage
//! ----------------
//! - The cross-validator and the nonlinearity test both build on
//!   [`FarModel`] for their per-series refits.

pub mod far;
pub mod mxfar;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::far::{FarFit, FarModel};
pub use self::mxfar::{MxfarFit, MxfarModel};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::far::{FarFit, FarModel};
    pub use super::mxfar::{MxfarFit, MxfarModel};
}
