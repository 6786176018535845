//! functional::core::design — lagged autoregressive design construction.
//!
//! Purpose
//! -------
//! Precompute, once per fit, the response rows, stacked lag predictors, and
//! decision-time reference values that every downstream consumer (point
//! estimators, residual computation, VAR fitting) shares. This mirrors the
//! usual workspace pattern: build the buffers up front, then let the hot
//! loops index into them without re-deriving lags.
//!
//! Key behaviors
//! -------------
//! - Trim `m = max(p, d)` leading observations so all lags exist; row `r`
//!   corresponds to time index `t = m + r`.
//! - Stack the `p` lag vectors `y[t−1], …, y[t−p]` into one `K·p` predictor
//!   row (lag-major blocks of `K` columns each).
//! - Record the reference value at decision time, `u[t−d]`, per row.
//! - Concatenate per-series designs into a [`PanelDesign`] preserving
//!   series order and per-series time ordering.
//!
//! Invariants & assumptions
//! ------------------------
//! - `responses.nrows() == predictors.nrows() == refs.len() == T − m`.
//! - `predictors.ncols() == K·p`; lag `l` occupies columns
//!   `(l−1)·K .. l·K`.
//! - Inputs have already passed [`crate::functional::core::data`]
//!   validation and a [`FarShape`] check, so `T > m` holds.
//!
//! Downstream usage
//! ----------------
//! - [`LaggedDesign`] feeds the single-series local-linear estimator, the
//!   in-sample residual pass, and the intercept-free VAR fit of the
//!   nonlinearity test; [`PanelDesign`] feeds the mixed-effects estimator.
//!
//! Testing notes
//! -------------
//! - Unit tests verify the row/column arithmetic and the exact lag layout
//!   on a small hand-checked series.
use crate::functional::core::shape::FarShape;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// LaggedDesign — trimmed response / predictor / reference buffers for one
/// series.
///
/// Fields
/// ------
/// - `responses`: `(T − m) × K` matrix of `y[t]` rows.
/// - `predictors`: `(T − m) × K·p` matrix of stacked lag rows.
/// - `refs`: length `T − m` vector of `u[t − d]` values.
///
/// Invariant: the three buffers agree on the row count and share the row ↔
/// time correspondence `t = m + r`.
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedDesign {
    /// Response rows `y[t]`, `t = m..T`.
    pub responses: Array2<f64>,
    /// Stacked lag predictors `[y[t−1] | … | y[t−p]]`.
    pub predictors: Array2<f64>,
    /// Reference values at decision time, `u[t−d]`.
    pub refs: Array1<f64>,
}

impl LaggedDesign {
    /// Build the trimmed design for one series.
    ///
    /// Parameters
    /// ----------
    /// - `y`: `ArrayView2<f64>` — observations, `T × K`.
    /// - `u`: `ArrayView1<f64>` — reference signal, length `T`.
    /// - `shape`: validated [`FarShape`] whose `t_len` matches `y.nrows()`.
    ///
    /// Notes
    /// -----
    /// - Infallible: shape/data consistency is enforced by the callers'
    ///   validated constructors, so this is pure buffer filling.
    pub fn build(y: ArrayView2<'_, f64>, u: ArrayView1<'_, f64>, shape: &FarShape) -> Self {
        let t_len = y.nrows();
        let k = y.ncols();
        let m = shape.trim();
        let n = t_len - m;

        let mut responses = Array2::zeros((n, k));
        let mut predictors = Array2::zeros((n, k * shape.p));
        let mut refs = Array1::zeros(n);

        for r in 0..n {
            let t = m + r;
            responses.row_mut(r).assign(&y.row(t));
            for lag in 1..=shape.p {
                let offset = (lag - 1) * k;
                for col in 0..k {
                    predictors[[r, offset + col]] = y[[t - lag, col]];
                }
            }
            refs[r] = u[t - shape.d];
        }

        LaggedDesign { responses, predictors, refs }
    }

    /// Number of retained rows, `T − max(p, d)`.
    pub fn n_rows(&self) -> usize {
        self.responses.nrows()
    }

    /// Response dimension `K`.
    pub fn dim(&self) -> usize {
        self.responses.ncols()
    }

    /// Number of stacked predictor columns, `K·p`.
    pub fn n_lag_cols(&self) -> usize {
        self.predictors.ncols()
    }
}

/// PanelDesign — per-series designs for a stacked group, in series order.
///
/// Holds one [`LaggedDesign`] per series plus each series's group index, so
/// the mixed-effects point estimator can route rows into the right mean and
/// deviation blocks without re-deriving the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDesign {
    /// One trimmed design per series, in stacking order.
    pub series: Vec<LaggedDesign>,
    /// Group index of each series.
    pub groups: Vec<usize>,
}

impl PanelDesign {
    /// Build per-series designs for every series of a panel.
    pub fn build(panel: &crate::functional::core::data::PanelData, shape: &FarShape) -> Self {
        let n_series = panel.n_series();
        let mut series = Vec::with_capacity(n_series);
        let mut groups = Vec::with_capacity(n_series);
        for s in 0..n_series {
            series.push(LaggedDesign::build(panel.series_y(s), panel.series_u(s), shape));
            groups.push(panel.group_of(s));
        }
        PanelDesign { series, groups }
    }

    /// Total number of series.
    pub fn n_series(&self) -> usize {
        self.series.len()
    }

    /// Number of groups (one past the largest group index).
    pub fn n_groups(&self) -> usize {
        self.groups.iter().copied().max().map_or(0, |g| g + 1)
    }

    /// Total design rows across all series.
    pub fn total_rows(&self) -> usize {
        self.series.iter().map(LaggedDesign::n_rows).sum()
    }

    /// Response dimension `K` (uniform across series).
    pub fn dim(&self) -> usize {
        self.series[0].dim()
    }

    /// Number of stacked predictor columns, `K·p` (uniform across series).
    pub fn n_lag_cols(&self) -> usize {
        self.series[0].n_lag_cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Row trimming and the exact lag-block layout of `LaggedDesign`.
    // - The reference-lag alignment `refs[r] = u[t − d]`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the full design layout on a hand-checked bivariate series.
    //
    // Given
    // -----
    // - y with rows [t, t+10] for t = 0..5, u = [0.0, 0.1, …, 0.5],
    //   p = 2, d = 1 (so m = 2, n = 3).
    //
    // Expect
    // ------
    // - Row r covers time t = r + 2 with responses y[t], predictor blocks
    //   [y[t−1] | y[t−2]], and refs u[t−1].
    fn lagged_design_build_lays_out_lags_and_refs_correctly() {
        // Arrange
        let y = array![
            [0.0, 10.0],
            [1.0, 11.0],
            [2.0, 12.0],
            [3.0, 13.0],
            [4.0, 14.0],
        ];
        let u = array![0.0, 0.1, 0.2, 0.3, 0.4];
        let shape = FarShape::new(2, 1, 5).expect("FAR(2, 1) valid for 5 observations");

        // Act
        let design = LaggedDesign::build(y.view(), u.view(), &shape);

        // Assert
        assert_eq!(design.n_rows(), 3);
        assert_eq!(design.n_lag_cols(), 4);
        assert_eq!(design.responses, array![[2.0, 12.0], [3.0, 13.0], [4.0, 14.0]]);
        assert_eq!(
            design.predictors,
            array![
                [1.0, 11.0, 0.0, 10.0],
                [2.0, 12.0, 1.0, 11.0],
                [3.0, 13.0, 2.0, 12.0],
            ]
        );
        assert_eq!(design.refs, array![0.1, 0.2, 0.3]);
    }

    #[test]
    // Purpose
    // -------
    // Check that d > p drives the trim and the reference alignment.
    //
    // Given
    // -----
    // - A univariate series of length 6 with p = 1, d = 3 (m = 3).
    //
    // Expect
    // ------
    // - 3 rows; refs pick u[t − 3]; predictors pick y[t − 1].
    fn lagged_design_build_respects_reference_lag_larger_than_order() {
        // Arrange
        let y = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let u = array![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let shape = FarShape::new(1, 3, 6).expect("FAR(1, 3) valid for 6 observations");

        // Act
        let design = LaggedDesign::build(y.view(), u.view(), &shape);

        // Assert
        assert_eq!(design.responses, array![[4.0], [5.0], [6.0]]);
        assert_eq!(design.predictors, array![[3.0], [4.0], [5.0]]);
        assert_eq!(design.refs, array![10.0, 20.0, 30.0]);
    }
}
