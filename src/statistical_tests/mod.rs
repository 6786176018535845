//! statistical_tests — hypothesis tests for functional coefficients.
//!
//! Purpose
//! -------
//! House the bootstrap test of coefficient nonlinearity: do the panel's
//! autoregressive coefficients genuinely vary with the reference signal,
//! or does a constant-coefficient VAR fit the data just as well? The
//! subtree bundles the test driver ([`nonlinearity`]), its linear baseline
//! ([`var`]), the shared input guards ([`validation`]), and the error
//! vocabulary ([`errors`]).
//!
//! Key behaviors
//! -------------
//! - The observed statistic sums per-series residual trace ratios between
//!   the VAR and functional fits over aligned rows.
//! - The null distribution comes from a subject-level residual bootstrap
//!   generated under the linear fit, with reproducible per-replicate RNG
//!   streams on the rayon pool.
//! - Per-replicate failures are contained as missing bootstrap statistics;
//!   only malformed inputs, unfittable observed series, or the loss of
//!   every replicate abort the test.
//!
//! Conventions
//! -----------
//! - Error messages are phrased in terms of domain constraints; all
//!   [`NLError`] values map to `PyValueError` at the Python boundary.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust,ignore
//!   use mxfar::statistical_tests::{NLOutcome, nonlinearity_test};
//!
//!   let outcome: NLOutcome = nonlinearity_test(&panel, p, d, &opts, 250, Some(42))?;
//!   ```
//!
//!   and typically runs the test before committing to a
//!   [`crate::functional::models::MxfarModel`] fit: a large p-value says
//!   the functional machinery is not earning its variance.
//!
//! Testing notes
//! -------------
//! - Unit tests cover error payloads, validation branches, the VAR
//!   baseline, and seeded reproducibility of the test driver; statistical
//!   size and power live in the integration suite.

pub mod errors;
pub mod nonlinearity;
pub mod validation;
pub mod var;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{NLError, NLResult};
pub use self::nonlinearity::{NLOutcome, nonlinearity_test};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mxfar::statistical_tests::prelude::*;
//
// to import the main testing surface in a single line.

pub mod prelude {
    pub use super::errors::{NLError, NLResult};
    pub use super::nonlinearity::{NLOutcome, nonlinearity_test};
}
