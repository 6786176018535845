//! functional::models::mxfar — mixed-effects panel fit.
//!
//! Purpose
//! -------
//! Orchestrate the panel pipeline: validate the shared model shape against
//! the uniform series length, build one evaluation grid from the *stacked*
//! reference signal, sweep the mixed-effects point estimator over the grid,
//! and derive per-series fitted values and residuals from each subject's
//! effective coefficient matrices (group mean + own deviation).
//!
//! Key behaviors
//! -------------
//! - One grid and one absolute bandwidth for the whole panel, derived from
//!   the stacked reference signal; all subjects are evaluated on the same
//!   cells so their curves are directly comparable.
//! - Residual / fitted arrays stack the per-series trimmed blocks in series
//!   order, each `(Tlength − max(p, d)) × K`; NaN rows mark design rows
//!   routed to missing cells, as in the single-series fit.
//! - Optional fPDC: one functional PDC per group mean curve and one per
//!   subject's effective curve.
//!
//! Invariants & assumptions
//! ------------------------
//! - All series share the length, dimension, and grouping recorded in the
//!   validated [`crate::functional::core::data::PanelData`].
//!
//! Downstream usage
//! ----------------
//! - The top-level panel entry point; the nonlinearity test and the
//!   cross-validator use the per-subject single-series path instead.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the stacked residual layout and the group/subject
//!   fPDC counts; decomposition quality lives with the estimator and the
//!   integration tests.
use crate::functional::core::data::PanelData;
use crate::functional::core::design::PanelDesign;
use crate::functional::core::field::MixedCoefficientField;
use crate::functional::core::grid::SignalGrid;
use crate::functional::core::options::FarOptions;
use crate::functional::core::shape::FarShape;
use crate::functional::errors::FarResult;
use crate::functional::estimators::{MixedLocalLinearEstimator, sweep_field};
use crate::functional::models::far::signal_range;
use crate::spectral::{FpdcField, fourier_frequencies, fpdc};
use ndarray::{Array2, ArrayView2, s};

/// MxfarModel — configuration of a mixed-effects panel fit.
///
/// Same knobs as the single-series [`crate::functional::models::FarModel`];
/// the shape is validated against the panel's uniform series length.
#[derive(Debug, Clone)]
pub struct MxfarModel {
    /// Autoregressive order `p ≥ 1`.
    pub p: usize,
    /// Reference-signal lag `d ≥ 1`.
    pub d: usize,
    /// Estimation options.
    pub opts: FarOptions,
}

impl MxfarModel {
    /// Bundle a model configuration.
    pub fn new(p: usize, d: usize, opts: FarOptions) -> Self {
        MxfarModel { p, d, opts }
    }

    /// Fit the mixed-effects functional-coefficient model to a panel.
    ///
    /// Parameters
    /// ----------
    /// - `panel`: validated stacked panel (uniform series length, finite).
    ///
    /// Returns
    /// -------
    /// `FarResult<MxfarFit>` with the shared grid, the mixed coefficient
    /// field, stacked fitted / residual arrays, and optionally the group
    /// and subject fPDC collections.
    ///
    /// Errors
    /// ------
    /// - Shape validation errors against the panel's series length, and
    ///   grid construction errors on the stacked reference signal (see
    ///   [`crate::functional::models::FarModel::estimate`]).
    ///
    /// Notes
    /// -----
    /// - Per-grid-point failures of the stacked solve surface as missing
    ///   cells shared by *all* subjects at that grid position.
    pub fn estimate(&self, panel: &PanelData) -> FarResult<MxfarFit> {
        let shape = FarShape::new(self.p, self.d, panel.series_len)?;
        let grid = SignalGrid::build(panel.u.view(), self.opts.numpoints)?;
        let design = PanelDesign::build(panel, &shape);

        let bandwidth = self.opts.bwp * signal_range(panel.u.view());
        let estimator = MixedLocalLinearEstimator::new(&design);
        let cells = sweep_field(&estimator, &grid, bandwidth);
        let field = MixedCoefficientField::from_cells(cells, design.groups.clone());

        let n_series = design.n_series();
        let rows_per_series = shape.retained();
        let k = panel.dim();
        let mut fitted = Array2::from_elem((n_series * rows_per_series, k), f64::NAN);
        let mut residuals = Array2::from_elem((n_series * rows_per_series, k), f64::NAN);
        for (sidx, series) in design.series.iter().enumerate() {
            let offset = sidx * rows_per_series;
            for r in 0..rows_per_series {
                let cell = grid.cell_of(series.refs[r]);
                if let Some(phi) = field.subject_matrix(cell, sidx) {
                    let prediction = phi.dot(&series.predictors.row(r));
                    for c in 0..k {
                        fitted[[offset + r, c]] = prediction[c];
                        residuals[[offset + r, c]] =
                            series.responses[[r, c]] - prediction[c];
                    }
                }
            }
        }

        let (group_fpdc, subject_fpdc) = if self.opts.compute_fpdc {
            let freqs = fourier_frequencies(panel.series_len);
            let groups = (0..panel.n_groups())
                .map(|g| {
                    fpdc(&field.mean_field(g), &freqs)
                        .expect("field cells are K×(K·p) stacked matrices")
                })
                .collect();
            let subjects = (0..n_series)
                .map(|s| {
                    fpdc(&field.subject_field(s), &freqs)
                        .expect("field cells are K×(K·p) stacked matrices")
                })
                .collect();
            (Some(groups), Some(subjects))
        } else {
            (None, None)
        };

        Ok(MxfarFit {
            shape,
            grid,
            field,
            fitted,
            residuals,
            rows_per_series,
            group_fpdc,
            subject_fpdc,
        })
    }
}

/// MxfarFit — fitted mixed-effects panel model.
///
/// Fields
/// ------
/// - `shape` / `grid`: shared order and evaluation grid of the fit.
/// - `field`: mixed coefficient field (per-group means, per-subject
///   deviations, per cell).
/// - `fitted` / `residuals`: stacked per-series trimmed blocks in series
///   order; NaN rows mark missing cells.
/// - `rows_per_series`: trimmed row count of each series block.
/// - `group_fpdc` / `subject_fpdc`: one fPDC per group mean curve and per
///   subject effective curve, present iff requested.
#[derive(Debug, Clone)]
pub struct MxfarFit {
    pub shape: FarShape,
    pub grid: SignalGrid,
    pub field: MixedCoefficientField,
    pub fitted: Array2<f64>,
    pub residuals: Array2<f64>,
    pub rows_per_series: usize,
    pub group_fpdc: Option<Vec<FpdcField>>,
    pub subject_fpdc: Option<Vec<FpdcField>>,
}

impl MxfarFit {
    /// Residual block of series `s`, `(Tlength − max(p, d)) × K`.
    pub fn series_residuals(&self, s: usize) -> ArrayView2<'_, f64> {
        let start = s * self.rows_per_series;
        self.residuals.slice(s![start..start + self.rows_per_series, ..])
    }

    /// Fitted block of series `s`, `(Tlength − max(p, d)) × K`.
    pub fn series_fitted(&self, s: usize) -> ArrayView2<'_, f64> {
        let start = s * self.rows_per_series;
        self.fitted.slice(s![start..start + self.rows_per_series, ..])
    }

    /// Number of grid cells where the stacked local solve failed.
    pub fn n_missing_cells(&self) -> usize {
        self.field.n_missing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rand_distr::StandardNormal;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The stacked residual layout and per-series block views.
    // - Group / subject fPDC counts when requested.
    //
    // They intentionally DO NOT cover:
    // - Mean/deviation recovery quality (estimator unit tests and the
    //   integration suite).
    // -------------------------------------------------------------------------

    /// Three-subject, two-group panel of seeded univariate AR(1) series.
    fn small_panel(t_len: usize) -> PanelData {
        let coeffs = [0.5, 0.3, -0.2];
        let mut y = Array2::zeros((3 * t_len, 1));
        let mut u = Array1::zeros(3 * t_len);
        for (s, &a) in coeffs.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(100 + s as u64);
            let mut prev = 0.0_f64;
            for t in 0..t_len {
                let eps: f64 = rng.sample(StandardNormal);
                prev = a * prev + eps;
                y[[s * t_len + t, 0]] = prev;
                u[s * t_len + t] = rng.sample(StandardNormal);
            }
        }
        PanelData::new(vec![2, 1], t_len, y, u).expect("panel should validate")
    }

    #[test]
    // Purpose
    // -------
    // Verify the stacked residual layout: one trimmed block per series, in
    // series order, with finite rows exactly where cells are populated.
    //
    // Given
    // -----
    // - A three-subject panel of length 300 fit with MXFAR(1, 1).
    //
    // Expect
    // ------
    // - residuals has 3 × 299 rows; `series_residuals(s)` views block s.
    // - Every finite residual row has a populated cell behind it.
    fn mxfar_fit_stacks_residual_blocks_in_series_order() {
        // Arrange
        let panel = small_panel(300);
        let model = MxfarModel::new(1, 1, FarOptions::new(0.2, 20, false).expect("valid options"));

        // Act
        let fit = model.estimate(&panel).expect("fit should succeed");

        // Assert
        assert_eq!(fit.rows_per_series, 299);
        assert_eq!(fit.residuals.nrows(), 3 * 299);
        for s in 0..3 {
            let block = fit.series_residuals(s);
            assert_eq!(block.nrows(), 299);
            for (r, row) in block.rows().into_iter().enumerate() {
                let cell = fit.grid.cell_of(panel.series_u(s)[r]);
                assert_eq!(
                    fit.field.cell(cell).is_none(),
                    row[0].is_nan(),
                    "series {s} row {r}: NaN flag and missing cell disagree"
                );
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify group and subject fPDC counts when requested.
    //
    // Given
    // -----
    // - The same panel fit with `compute_fpdc = true`.
    //
    // Expect
    // ------
    // - 2 group fPDCs and 3 subject fPDCs, each with one entry per cell.
    fn mxfar_fit_attaches_group_and_subject_fpdc_on_request() {
        // Arrange
        let panel = small_panel(300);
        let model = MxfarModel::new(1, 1, FarOptions::new(0.2, 20, true).expect("valid options"));

        // Act
        let fit = model.estimate(&panel).expect("fit should succeed");

        // Assert
        let groups = fit.group_fpdc.expect("group fPDC requested");
        let subjects = fit.subject_fpdc.expect("subject fPDC requested");
        assert_eq!(groups.len(), 2);
        assert_eq!(subjects.len(), 3);
        for field in groups.iter().chain(subjects.iter()) {
            assert_eq!(field.len(), fit.grid.n_cells());
        }
    }
}
