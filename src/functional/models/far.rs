//! functional::models::far — single-series functional-coefficient fit.
//!
//! Purpose
//! -------
//! Orchestrate the full single-series pipeline: validate the model shape
//! against the data, build the evaluation grid and the trimmed lagged
//! design, sweep the local-linear point estimator over the grid, and derive
//! in-sample fitted values and residuals by routing every design row
//! through its reference-signal cell.
//!
//! Key behaviors
//! -------------
//! - Convert the bandwidth proportion `bwp` into the absolute kernel
//!   bandwidth `h = bwp · range(u)` over the observed reference signal.
//! - Contain per-point estimation failures as missing field cells; rows
//!   routed to missing cells get NaN fitted values and residuals rather
//!   than aborting the fit.
//! - Optionally attach the functional PDC of the estimated field
//!   (`compute_fpdc`), on the Fourier frequencies of the series length.
//!
//! Invariants & assumptions
//! ------------------------
//! - `fitted` and `residuals` have exactly `T − max(p, d)` rows, aligned
//!   with the design rows (`t = max(p, d) + r`).
//! - A row's fitted value is finite iff its reference cell is populated;
//!   NaN rows and missing cells agree exactly.
//!
//! Downstream usage
//! ----------------
//! - The cross-validator refits this model per fold and reuses
//!   [`FarFit::predict_row`] for out-of-sample points; the nonlinearity
//!   test compares these residuals against an intercept-free VAR's.
//!
//! Testing notes
//! -------------
//! - Unit tests cover shape validation, residual/missing-cell agreement,
//!   and near-zero residuals on noise-free linear data; statistical
//!   behavior on functional data lives in the integration tests.
use crate::functional::core::data::FarData;
use crate::functional::core::design::LaggedDesign;
use crate::functional::core::field::CoefficientField;
use crate::functional::core::grid::SignalGrid;
use crate::functional::core::options::FarOptions;
use crate::functional::core::shape::FarShape;
use crate::functional::errors::FarResult;
use crate::functional::estimators::{LocalLinearEstimator, sweep_field};
use crate::spectral::{FpdcField, fourier_frequencies, fpdc};
use ndarray::{Array1, Array2, ArrayView1};

/// FarModel — configuration of a single-series functional-coefficient fit.
///
/// Purpose
/// -------
/// Bundle the autoregressive order `p`, the reference lag `d`, and the
/// estimation options; [`FarModel::estimate`] runs the pipeline on one
/// series.
///
/// Notes
/// -----
/// - Construction is unchecked; order and lag are validated against the
///   series length when `estimate` builds the [`FarShape`].
#[derive(Debug, Clone)]
pub struct FarModel {
    /// Autoregressive order `p ≥ 1`.
    pub p: usize,
    /// Reference-signal lag `d ≥ 1`.
    pub d: usize,
    /// Estimation options.
    pub opts: FarOptions,
}

impl FarModel {
    /// Bundle a model configuration.
    pub fn new(p: usize, d: usize, opts: FarOptions) -> Self {
        FarModel { p, d, opts }
    }

    /// Fit the functional-coefficient model to one series.
    ///
    /// Parameters
    /// ----------
    /// - `data`: validated series container (finite, shape-consistent).
    ///
    /// Returns
    /// -------
    /// `FarResult<FarFit>` holding the grid, the estimated coefficient
    /// field, aligned fitted values and residuals, and optionally the
    /// functional PDC.
    ///
    /// Errors
    /// ------
    /// - [`crate::functional::errors::FarError::InvalidOrder`] /
    ///   [`crate::functional::errors::FarError::InvalidReferenceLag`] /
    ///   [`crate::functional::errors::FarError::SeriesTooShort`] from shape
    ///   validation.
    /// - [`crate::functional::errors::FarError::InvalidBandwidth`] /
    ///   [`crate::functional::errors::FarError::InvalidGridResolution`] /
    ///   [`crate::functional::errors::FarError::DegenerateSignalRange`]
    ///   from option and grid validation.
    ///
    /// Notes
    /// -----
    /// - Per-grid-point estimation failures do NOT error: they surface as
    ///   missing field cells and NaN rows in `fitted` / `residuals`.
    pub fn estimate(&self, data: &FarData) -> FarResult<FarFit> {
        let shape = FarShape::new(self.p, self.d, data.t_len())?;
        let grid = SignalGrid::build(data.u.view(), self.opts.numpoints)?;
        let design = LaggedDesign::build(data.y.view(), data.u.view(), &shape);

        let bandwidth = self.opts.bwp * signal_range(data.u.view());
        let estimator = LocalLinearEstimator::new(&design);
        let field = CoefficientField::from_cells(sweep_field(&estimator, &grid, bandwidth));

        let (fitted, residuals) = in_sample_residuals(&design, &grid, &field);
        let fpdc_field = self.opts.compute_fpdc.then(|| {
            fpdc(&field, &fourier_frequencies(data.t_len()))
                .expect("field cells are K×(K·p) stacked matrices")
        });

        Ok(FarFit { shape, grid, field, fitted, residuals, fpdc: fpdc_field })
    }
}

/// FarFit — fitted single-series functional-coefficient model.
///
/// Fields
/// ------
/// - `shape`: validated order / reference-lag / length triple of the fit.
/// - `grid`: evaluation grid built from the observed reference signal.
/// - `field`: estimated coefficient field, one optional `K × K·p` matrix
///   per grid cell.
/// - `fitted` / `residuals`: `(T − max(p, d)) × K` in-sample arrays aligned
///   with the design rows; NaN where the row's reference cell is missing.
/// - `fpdc`: functional PDC of the field, present iff requested.
#[derive(Debug, Clone)]
pub struct FarFit {
    pub shape: FarShape,
    pub grid: SignalGrid,
    pub field: CoefficientField,
    pub fitted: Array2<f64>,
    pub residuals: Array2<f64>,
    pub fpdc: Option<FpdcField>,
}

impl FarFit {
    /// One-step prediction from a stacked lag row and a reference value.
    ///
    /// Parameters
    /// ----------
    /// - `lags`: stacked predictor row `[y[t−1] | … | y[t−p]]`, length
    ///   `K·p`.
    /// - `reference`: reference value at decision time, `u[t−d]`.
    ///
    /// Returns
    /// -------
    /// `Some(Array1<f64>)` of length `K`, or `None` when the reference
    /// value falls in a missing field cell.
    pub fn predict_row(&self, lags: ArrayView1<'_, f64>, reference: f64) -> Option<Array1<f64>> {
        self.field.cell(self.grid.cell_of(reference)).map(|phi| phi.dot(&lags))
    }

    /// Number of grid cells where local estimation failed.
    pub fn n_missing_cells(&self) -> usize {
        self.field.n_missing()
    }
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Observed range of the reference signal; strictly positive whenever the
/// grid build succeeded.
#[inline]
pub(crate) fn signal_range(u: ArrayView1<'_, f64>) -> f64 {
    let (min, max) = u.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    });
    max - min
}

/// Route every design row through its reference cell and compute aligned
/// fitted / residual arrays, NaN where the cell is missing.
pub(crate) fn in_sample_residuals(
    design: &LaggedDesign, grid: &SignalGrid, field: &CoefficientField,
) -> (Array2<f64>, Array2<f64>) {
    let n = design.n_rows();
    let k = design.dim();
    let mut fitted = Array2::from_elem((n, k), f64::NAN);
    let mut residuals = Array2::from_elem((n, k), f64::NAN);
    for r in 0..n {
        if let Some(phi) = field.cell(grid.cell_of(design.refs[r])) {
            let prediction = phi.dot(&design.predictors.row(r));
            for c in 0..k {
                fitted[[r, c]] = prediction[c];
                residuals[[r, c]] = design.responses[[r, c]] - prediction[c];
            }
        }
    }
    (fitted, residuals)
}
