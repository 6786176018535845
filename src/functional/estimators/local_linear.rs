//! functional::estimators::local_linear — single-series local-linear solve.
//!
//! Purpose
//! -------
//! Implement the single-series point-estimator contract: given the trimmed
//! lagged design of one series and a scalar grid value `u0`, solve the
//! kernel-weighted local-linear least-squares problem and return the
//! `K × K·p` lag-coefficient matrix estimated at `u0`.
//!
//! Key behaviors
//! -------------
//! - Approximate each coefficient function near `u0` by a first-order
//!   expansion `f(u) ≈ A + B·(u − u0)`, regressing responses on the
//!   augmented columns `[lags, 1, lags·Δu, Δu]` with Epanechnikov weights
//!   `K((uᵣ − u0)/h)`.
//! - Solve the weighted normal equations with a Cholesky factorization of
//!   the weighted Gram matrix (ndarray buffers bridged into nalgebra for
//!   the dense solve).
//! - Keep only the level lag block `A`; the intercept and all slope
//!   columns are nuisance terms discarded by convention.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fails with [`FarError::InsufficientLocalSupport`] when fewer rows
//!   carry positive weight than the local system has columns, and with
//!   [`FarError::SingularLocalSystem`] when the Gram matrix has no
//!   Cholesky factorization. Both are contained by the grid sweep.
//! - The design is borrowed read-only; one estimator instance is shared
//!   across the parallel sweep.
//!
//! Conventions
//! -----------
//! - Augmented column layout: level lags `0..K·p`, level intercept `K·p`,
//!   slope lags `K·p+1 .. 2·K·p+1`, slope intercept `2·K·p+1`.
//!
//! Downstream usage
//! ----------------
//! - Injected by `FarModel::estimate` (and by the per-subject fits inside
//!   the cross-validator and the nonlinearity test) through the
//!   [`PointEstimator`] seam.
//!
//! Testing notes
//! -------------
//! - Unit tests recover a constant coefficient matrix exactly from
//!   noise-free linear data and exercise both failure paths.
use crate::functional::core::design::LaggedDesign;
use crate::functional::errors::{FarError, FarResult};
use crate::functional::estimators::PointEstimator;
use crate::functional::estimators::kernel::epanechnikov;
use nalgebra::DMatrix;
use ndarray::Array2;

/// LocalLinearEstimator — kernel-weighted local-linear solver for one
/// series.
///
/// Borrows the series's trimmed [`LaggedDesign`]; construction is free and
/// the instance is shared read-only across the parallel grid sweep.
#[derive(Debug, Clone, Copy)]
pub struct LocalLinearEstimator<'a> {
    design: &'a LaggedDesign,
}

impl<'a> LocalLinearEstimator<'a> {
    /// Wrap a prebuilt design.
    pub fn new(design: &'a LaggedDesign) -> Self {
        LocalLinearEstimator { design }
    }
}

impl PointEstimator for LocalLinearEstimator<'_> {
    type Coefficients = Array2<f64>;

    /// Solve the local-linear system at `u0` and return the `K × K·p`
    /// lag-coefficient matrix.
    ///
    /// Errors
    /// ------
    /// - [`FarError::InsufficientLocalSupport`] when fewer positively
    ///   weighted rows exist than augmented columns.
    /// - [`FarError::SingularLocalSystem`] when the weighted Gram matrix is
    ///   not positive definite.
    fn estimate_at(&self, u0: f64, bandwidth: f64) -> FarResult<Array2<f64>> {
        let design = self.design;
        let k = design.dim();
        let kp = design.n_lag_cols();
        let base = kp + 1;
        let ncols = 2 * base;

        let support = weighted_rows(design, u0, bandwidth);
        if support.len() < ncols {
            return Err(FarError::InsufficientLocalSupport {
                needed: ncols,
                available: support.len(),
            });
        }

        // Weighted design: rows scaled by √w so the plain normal equations
        // of (Zw, Yw) coincide with the weighted ones of (Z, Y).
        let mut zw = DMatrix::<f64>::zeros(support.len(), ncols);
        let mut yw = DMatrix::<f64>::zeros(support.len(), k);
        for (i, &(r, w)) in support.iter().enumerate() {
            let sw = w.sqrt();
            let du = design.refs[r] - u0;
            for c in 0..kp {
                let x = design.predictors[[r, c]];
                zw[(i, c)] = sw * x;
                zw[(i, base + c)] = sw * x * du;
            }
            zw[(i, kp)] = sw;
            zw[(i, base + kp)] = sw * du;
            for c in 0..k {
                yw[(i, c)] = sw * design.responses[[r, c]];
            }
        }

        let gram = zw.transpose() * &zw;
        let rhs = zw.transpose() * &yw;
        let chol = gram.cholesky().ok_or(FarError::SingularLocalSystem)?;
        let beta = chol.solve(&rhs);

        // Level lag block only; intercept and slope columns are discarded.
        let mut coeffs = Array2::zeros((k, kp));
        for i in 0..k {
            for j in 0..kp {
                coeffs[[i, j]] = beta[(j, i)];
            }
        }
        Ok(coeffs)
    }
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Collect `(row, weight)` pairs with strictly positive kernel weight at
/// `u0`.
#[inline]
fn weighted_rows(design: &LaggedDesign, u0: f64, bandwidth: f64) -> Vec<(usize, f64)> {
    design
        .refs
        .iter()
        .enumerate()
        .filter_map(|(r, &u)| {
            let w = epanechnikov((u - u0) / bandwidth);
            (w > 0.0).then_some((r, w))
        })
        .collect()
}
