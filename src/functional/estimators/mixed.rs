//! functional::estimators::mixed — mixed-effects stacked local solve.
//!
//! Purpose
//! -------
//! Implement the stacked point-estimator contract: one kernel-weighted
//! local-linear solve over the *entire* panel at a scalar grid value,
//! returning per-group mean coefficient blocks and per-subject deviation
//! (random-effect offset) blocks. A subject's effective coefficient matrix
//! at the grid value is its group's mean block plus its own deviation
//! block.
//!
//! Key behaviors
//! -------------
//! - Route every design row into its group's mean columns *and* its
//!   subject's deviation columns (level and slope each), so the stacked
//!   regression estimates the decomposition jointly.
//! - Ridge-penalize the deviation columns only. The raw decomposition is
//!   unidentified (a constant can shuttle between a group mean and its
//!   subjects' deviations); the penalty pins the decomposition and shrinks
//!   subject deviations toward zero, which is exactly the mean-zero
//!   behavior expected of random effects.
//! - Solve with a Cholesky factorization of the penalized weighted Gram
//!   matrix; failures are contained as missing cells, as in the
//!   single-series path.
//!
//! Invariants & assumptions
//! ------------------------
//! - All series share one response dimension `K` and order `p` (enforced
//!   upstream by panel validation and the shared [`FarShape`]).
//! - A group with no observations near `u0` leaves its unpenalized mean
//!   columns without support; the Cholesky then fails and the whole cell
//!   is recorded missing — the contract's failure mode for insufficient
//!   local support on a stacked design.
//!
//! Conventions
//! -----------
//! - Stacked column layout (with `g` groups, `N` subjects, `kp = K·p`):
//!   group level blocks `0 .. g·kp`, group slope blocks `g·kp .. 2g·kp`,
//!   subject level deviations `2g·kp .. (2g+N)·kp`, subject slope
//!   deviations `(2g+N)·kp .. (2g+2N)·kp`, then per-group level and slope
//!   intercepts. Intercepts and slope blocks are nuisance columns
//!   discarded from the output.
//!
//! Downstream usage
//! ----------------
//! - Injected by `MxfarModel::estimate` through the [`PointEstimator`]
//!   seam; outputs are collected into a
//!   [`crate::functional::core::field::MixedCoefficientField`].
//!
//! Testing notes
//! -------------
//! - Unit tests verify that a two-subject group with symmetric constant
//!   offsets yields mean ≈ the common coefficient and deviations that are
//!   (approximately) opposite, and that deviations shrink toward zero when
//!   subjects are identical.
use crate::functional::core::design::PanelDesign;
use crate::functional::core::field::MixedCoefficients;
use crate::functional::errors::{FarError, FarResult};
use crate::functional::estimators::PointEstimator;
use crate::functional::estimators::kernel::epanechnikov;
use nalgebra::DMatrix;
use ndarray::Array2;

/// Ridge weight on deviation columns, relative to the mean diagonal of the
/// weighted Gram matrix. Large enough to pin the mean/deviation
/// decomposition, small enough to leave genuine subject offsets visible.
const DEVIATION_RIDGE: f64 = 1e-3;

/// MixedLocalLinearEstimator — stacked kernel-weighted solver for a panel.
///
/// Borrows the panel's per-series designs; shared read-only across the
/// parallel grid sweep.
#[derive(Debug, Clone, Copy)]
pub struct MixedLocalLinearEstimator<'a> {
    design: &'a PanelDesign,
}

impl<'a> MixedLocalLinearEstimator<'a> {
    /// Wrap a prebuilt panel design.
    pub fn new(design: &'a PanelDesign) -> Self {
        MixedLocalLinearEstimator { design }
    }
}

impl PointEstimator for MixedLocalLinearEstimator<'_> {
    type Coefficients = MixedCoefficients;

    /// Solve the stacked local system at `u0` and return the per-group
    /// mean and per-subject deviation blocks.
    ///
    /// Errors
    /// ------
    /// - [`FarError::InsufficientLocalSupport`] when fewer positively
    ///   weighted rows exist than a single series's local system needs.
    /// - [`FarError::SingularLocalSystem`] when the penalized Gram matrix
    ///   is not positive definite (e.g. a group with no local support).
    fn estimate_at(&self, u0: f64, bandwidth: f64) -> FarResult<MixedCoefficients> {
        let design = self.design;
        let k = design.dim();
        let kp = design.n_lag_cols();
        let g = design.n_groups();
        let n_sub = design.n_series();

        // Column offsets per the layout documented in the module header.
        let group_level = |j: usize| j * kp;
        let group_slope = |j: usize| (g + j) * kp;
        let subject_level = |s: usize| (2 * g + s) * kp;
        let subject_slope = |s: usize| (2 * g + n_sub + s) * kp;
        let intercept_base = 2 * kp * (g + n_sub);
        let ncols = intercept_base + 2 * g;

        // Per-row support across the whole stack.
        let mut support: Vec<(usize, usize, f64)> = Vec::new(); // (series, row, weight)
        for (s, series) in design.series.iter().enumerate() {
            for (r, &u) in series.refs.iter().enumerate() {
                let w = epanechnikov((u - u0) / bandwidth);
                if w > 0.0 {
                    support.push((s, r, w));
                }
            }
        }
        let min_rows = 2 * (kp + 1);
        if support.len() < min_rows {
            return Err(FarError::InsufficientLocalSupport {
                needed: min_rows,
                available: support.len(),
            });
        }

        let mut zw = DMatrix::<f64>::zeros(support.len(), ncols);
        let mut yw = DMatrix::<f64>::zeros(support.len(), k);
        for (i, &(s, r, w)) in support.iter().enumerate() {
            let series = &design.series[s];
            let group = design.groups[s];
            let sw = w.sqrt();
            let du = series.refs[r] - u0;
            for c in 0..kp {
                let x = sw * series.predictors[[r, c]];
                zw[(i, group_level(group) + c)] = x;
                zw[(i, group_slope(group) + c)] = x * du;
                zw[(i, subject_level(s) + c)] = x;
                zw[(i, subject_slope(s) + c)] = x * du;
            }
            zw[(i, intercept_base + group)] = sw;
            zw[(i, intercept_base + g + group)] = sw * du;
            for c in 0..k {
                yw[(i, c)] = sw * series.responses[[r, c]];
            }
        }

        let mut gram = zw.transpose() * &zw;
        let rhs = zw.transpose() * &yw;

        // Ridge on deviation columns only; scaled to the problem so the
        // penalty tracks the magnitude of the weighted regressors.
        let mean_diag = gram.diagonal().sum() / ncols as f64;
        let lambda = DEVIATION_RIDGE * mean_diag;
        for c in subject_level(0)..subject_slope(n_sub - 1) + kp {
            gram[(c, c)] += lambda;
        }

        let chol = gram.cholesky().ok_or(FarError::SingularLocalSystem)?;
        let beta = chol.solve(&rhs);

        let extract_block = |offset: usize| -> Array2<f64> {
            let mut block = Array2::zeros((k, kp));
            for i in 0..k {
                for j in 0..kp {
                    block[[i, j]] = beta[(offset + j, i)];
                }
            }
            block
        };

        let mean = (0..g).map(|j| extract_block(group_level(j))).collect();
        let deviation = (0..n_sub).map(|s| extract_block(subject_level(s))).collect();
        Ok(MixedCoefficients { mean, deviation })
    }
}
