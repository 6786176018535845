//! functional::estimators — local point estimation behind one interface.
//!
//! Purpose
//! -------
//! Define the strategy seam between the grid orchestration and the local
//! solvers: a single [`PointEstimator`] trait with two implementations
//! (single-series local-linear, mixed-effects stacked), plus the grid sweep
//! that evaluates whichever estimator is injected at every evaluation point
//! and collects per-cell results.
//!
//! Key behaviors
//! -------------
//! - [`PointEstimator::estimate_at`] produces the local coefficient
//!   estimate at one scalar grid value, or fails with a contained
//!   [`FarError`] (insufficient local support, singular weighted system).
//! - [`sweep_field`] maps the estimator over all grid points in parallel —
//!   the per-point solves are mutually independent and share only
//!   read-only design buffers — and downgrades per-point failures to
//!   missing cells (`None`) so estimation never aborts.
//!
//! Invariants & assumptions
//! ------------------------
//! - The sweep output has exactly one entry per grid evaluation point, in
//!   grid order, regardless of how many points failed.
//! - Estimators borrow a prebuilt design and are cheap to share across
//!   worker threads (`Sync` bound); results are merged by index only.
//!
//! Conventions
//! -----------
//! - `bandwidth` is the absolute kernel bandwidth `h` (the model façades
//!   convert the `bwp` proportion before sweeping).
//!
//! Downstream usage
//! ----------------
//! - `FarModel` injects [`LocalLinearEstimator`]; `MxfarModel` injects
//!   [`MixedLocalLinearEstimator`]. The façades wrap the sweep output in
//!   the matching field type.
//!
//! Testing notes
//! -------------
//! - The estimator implementations carry their own unit tests; the sweep's
//!   order / length guarantee is exercised indirectly by the field
//!   invariants asserted in the model tests.
use crate::functional::core::grid::SignalGrid;
use crate::functional::errors::FarResult;
use rayon::prelude::*;

pub mod kernel;
pub mod local_linear;
pub mod mixed;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::local_linear::LocalLinearEstimator;
pub use self::mixed::MixedLocalLinearEstimator;

/// PointEstimator — local coefficient estimation at one grid value.
///
/// Purpose
/// -------
/// Abstract the low-level weighted local-linear solve so the grid sweep and
/// the model façades are agnostic to whether a single series or a stacked
/// mixed-effects design is being fit.
///
/// Notes
/// -----
/// - Implementations must be `Sync`: the sweep shares one estimator across
///   worker threads. `Coefficients` must be `Send` so per-point results can
///   be merged by index.
/// - Failures are *contained*: the sweep records them as missing cells
///   rather than propagating.
pub trait PointEstimator: Sync {
    /// Per-cell output: a plain coefficient matrix for single series, a
    /// mean + deviation decomposition for mixed fits.
    type Coefficients: Send;

    /// Estimate the local coefficients at scalar grid value `u0` with
    /// absolute kernel bandwidth `bandwidth`.
    fn estimate_at(&self, u0: f64, bandwidth: f64) -> FarResult<Self::Coefficients>;
}

/// Evaluate `estimator` at every grid point and collect per-cell results.
///
/// Parameters
/// ----------
/// - `estimator`: the injected [`PointEstimator`].
/// - `grid`: evaluation grid; one output entry per `grid.points()` entry.
/// - `bandwidth`: absolute kernel bandwidth `h`.
///
/// Returns
/// -------
/// A vector with exactly `grid.n_cells()` entries in grid order; `None`
/// marks evaluation points where the local solve failed.
///
/// Notes
/// -----
/// - Runs the per-point solves on the rayon pool; they are independent and
///   share only the read-only design, so no synchronization is needed
///   beyond the final merge by index.
pub fn sweep_field<E: PointEstimator>(
    estimator: &E, grid: &SignalGrid, bandwidth: f64,
) -> Vec<Option<E::Coefficients>> {
    grid.points().par_iter().map(|&u0| estimator.estimate_at(u0, bandwidth).ok()).collect()
}

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::local_linear::LocalLinearEstimator;
    pub use super::mixed::MixedLocalLinearEstimator;
    pub use super::{PointEstimator, sweep_field};
}
