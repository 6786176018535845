//! evaluation — out-of-sample model scoring.
//!
//! Purpose
//! -------
//! House the rolling-origin accumulated prediction error ([`ape`]), the
//! cross-validation score used to choose the autoregressive order, the
//! reference lag, and the bandwidth before a final panel fit.

pub mod ape;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ape::ape;
pub use self::errors::{ApeError, ApeResult};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::ape::ape;
    pub use super::errors::{ApeError, ApeResult};
}
