//! mxfar — functional-coefficient autoregressions with mixed effects.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the estimation stack to Python via the `_mxfar` extension
//! module. The crate estimates autoregressive coefficients as smooth
//! functions of a lagged reference signal, for single series (FAR) and for
//! grouped panels with subject-level random effects (MXFAR), and ships the
//! companion diagnostics: rolling-origin prediction error, a bootstrap
//! nonlinearity test, and functional partial directed coherence.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules ([`functional`], [`evaluation`],
//!   [`spectral`], [`statistical_tests`]) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for
//!   the `_mxfar` Python extension when `python-bindings` is enabled.
//! - Create and register Python submodules (`functional_models`,
//!   `statistical_tests`) under `mxfar` so dot-notation imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input conversion, and error
//!   mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror
//!   the invariants of their Rust counterparts (`FarFit`, `MxfarFit`,
//!   `NLOutcome`).
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_mxfar.<submodule>` and are
//!   typically wrapped by thin pure-Python facades in the top-level
//!   `mxfar` package.
//! - Errors from core Rust code are rich enums internally and become
//!   `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules (see
//!   [`prelude`]) and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the integration suite under `tests/`; binding smoke tests run
//!   from Python against the compiled extension.

pub mod evaluation;
pub mod functional;
pub mod spectral;
pub mod statistical_tests;
pub mod utils;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use crate::evaluation::prelude::*;
    pub use crate::functional::prelude::*;
    pub use crate::spectral::prelude::*;
    pub use crate::statistical_tests::prelude::*;
}

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    functional::models::{FarFit, FarModel, MxfarFit, MxfarModel},
    statistical_tests::nonlinearity::{NLOutcome, nonlinearity_test},
    utils::{
        extract_far_data, extract_far_options, extract_panel_data, matrix_to_rows,
    },
};

/// Map an out-of-range accessor index to a Python `IndexError`.
#[cfg(feature = "python-bindings")]
fn check_index(index: usize, len: usize, what: &str) -> PyResult<()> {
    if index >= len {
        return Err(pyo3::exceptions::PyIndexError::new_err(format!(
            "index {index} out of range for {len} {what}"
        )));
    }
    Ok(())
}

/// FAR — Python-facing wrapper for single-series functional fits.
///
/// Purpose
/// -------
/// Run [`FarModel::estimate`] from Python and hold the resulting
/// [`FarFit`] for inspection through property getters.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `FAR(y, u, p=1, d=1, bwp=0.1, numpoints=50, compute_fpdc=False)`:
/// - `y`: 2-D float64 array-like, rows = time, columns = dimensions.
/// - `u`: 1-D float64 array-like of the same length.
/// - `p` / `d`: autoregressive order and reference lag.
/// - `bwp` / `numpoints` / `compute_fpdc`: estimation options.
///
/// Notes
/// -----
/// - Native Rust code should call [`FarModel::estimate`] directly; this
///   type exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "mxfar.functional_models")]
pub struct FAR {
    /// The fitted single-series model.
    inner: FarFit,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl FAR {
    #[new]
    #[pyo3(
        signature = (y, u, p = 1, d = 1, bwp = None, numpoints = None, compute_fpdc = None),
        text_signature = "(y, u, /, p=1, d=1, bwp=0.1, numpoints=50, compute_fpdc=False)"
    )]
    pub fn fit<'py>(
        py: Python<'py>, y: &Bound<'py, PyAny>, u: &Bound<'py, PyAny>, p: usize, d: usize,
        bwp: Option<f64>, numpoints: Option<usize>, compute_fpdc: Option<bool>,
    ) -> PyResult<FAR> {
        let data = extract_far_data(py, y, u)?;
        let opts = extract_far_options(bwp, numpoints, compute_fpdc)?;
        let inner = FarModel::new(p, d, opts).estimate(&data)?;
        Ok(FAR { inner })
    }

    /// Grid evaluation points, one per coefficient cell.
    #[getter]
    pub fn grid_points(&self) -> Vec<f64> {
        self.inner.grid.points().to_vec()
    }

    /// Number of grid cells where local estimation failed.
    #[getter]
    pub fn n_missing_cells(&self) -> usize {
        self.inner.n_missing_cells()
    }

    /// In-sample residuals (NaN rows mark missing cells), row-major.
    #[getter]
    pub fn residuals(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(&self.inner.residuals)
    }

    /// In-sample fitted values, row-major.
    #[getter]
    pub fn fitted(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(&self.inner.fitted)
    }

    /// Coefficient matrix of one grid cell, or `None` where estimation
    /// failed.
    pub fn coefficients(&self, cell: usize) -> PyResult<Option<Vec<Vec<f64>>>> {
        check_index(cell, self.inner.field.n_cells(), "grid cells")?;
        Ok(self.inner.field.cell(cell).map(matrix_to_rows))
    }
}

/// MXFAR — Python-facing wrapper for mixed-effects panel fits.
///
/// Constructed from Python via
/// `MXFAR(sizes, series_len, y, u, p=1, d=1, bwp=0.1, numpoints=50,
/// compute_fpdc=False)` with `y` / `u` stacked series-by-series.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "mxfar.functional_models")]
pub struct MXFAR {
    /// The fitted panel model.
    inner: MxfarFit,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MXFAR {
    #[new]
    #[pyo3(
        signature = (
            sizes, series_len, y, u, p = 1, d = 1, bwp = None, numpoints = None,
            compute_fpdc = None,
        ),
        text_signature = "(sizes, series_len, y, u, /, p=1, d=1, bwp=0.1, numpoints=50, \
                          compute_fpdc=False)"
    )]
    pub fn fit<'py>(
        py: Python<'py>, sizes: Vec<usize>, series_len: usize, y: &Bound<'py, PyAny>,
        u: &Bound<'py, PyAny>, p: usize, d: usize, bwp: Option<f64>, numpoints: Option<usize>,
        compute_fpdc: Option<bool>,
    ) -> PyResult<MXFAR> {
        let panel = extract_panel_data(py, sizes, series_len, y, u)?;
        let opts = extract_far_options(bwp, numpoints, compute_fpdc)?;
        let inner = MxfarModel::new(p, d, opts).estimate(&panel)?;
        Ok(MXFAR { inner })
    }

    /// Grid evaluation points, one per coefficient cell.
    #[getter]
    pub fn grid_points(&self) -> Vec<f64> {
        self.inner.grid.points().to_vec()
    }

    /// Number of grid cells where the stacked solve failed.
    #[getter]
    pub fn n_missing_cells(&self) -> usize {
        self.inner.n_missing_cells()
    }

    /// Stacked in-sample residuals (per-series blocks in series order).
    #[getter]
    pub fn residuals(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(&self.inner.residuals)
    }

    /// Group-mean coefficient matrix at one grid cell.
    pub fn group_mean(&self, cell: usize, group: usize) -> PyResult<Option<Vec<Vec<f64>>>> {
        check_index(cell, self.inner.field.n_cells(), "grid cells")?;
        check_index(group, self.inner.field.n_groups(), "groups")?;
        Ok(self.inner.field.group_mean(cell, group).map(matrix_to_rows))
    }

    /// Subject deviation matrix at one grid cell.
    pub fn subject_deviation(&self, cell: usize, subject: usize) -> PyResult<Option<Vec<Vec<f64>>>> {
        check_index(cell, self.inner.field.n_cells(), "grid cells")?;
        check_index(subject, self.inner.field.n_subjects(), "subjects")?;
        Ok(self.inner.field.subject_deviation(cell, subject).map(matrix_to_rows))
    }

    /// Effective subject coefficient matrix (group mean + deviation) at
    /// one grid cell.
    pub fn subject_coefficients(
        &self, cell: usize, subject: usize,
    ) -> PyResult<Option<Vec<Vec<f64>>>> {
        check_index(cell, self.inner.field.n_cells(), "grid cells")?;
        check_index(subject, self.inner.field.n_subjects(), "subjects")?;
        Ok(self.inner.field.subject_matrix(cell, subject).map(|m| matrix_to_rows(&m)))
    }
}

/// NonlinearityTest — Python-facing wrapper for the bootstrap test.
///
/// Constructed from Python via
/// `NonlinearityTest(sizes, series_len, y, u, p=1, d=1, bwp=0.1,
/// numpoints=50, maxboot=200, seed=None)`; running the constructor runs
/// the test.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "mxfar.statistical_tests")]
pub struct NonlinearityTest {
    /// The full test outcome.
    inner: NLOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl NonlinearityTest {
    #[new]
    #[pyo3(
        signature = (
            sizes, series_len, y, u, p = 1, d = 1, bwp = None, numpoints = None,
            maxboot = 200, seed = None,
        ),
        text_signature = "(sizes, series_len, y, u, /, p=1, d=1, bwp=0.1, numpoints=50, \
                          maxboot=200, seed=None)"
    )]
    pub fn run<'py>(
        py: Python<'py>, sizes: Vec<usize>, series_len: usize, y: &Bound<'py, PyAny>,
        u: &Bound<'py, PyAny>, p: usize, d: usize, bwp: Option<f64>, numpoints: Option<usize>,
        maxboot: usize, seed: Option<u64>,
    ) -> PyResult<NonlinearityTest> {
        let panel = extract_panel_data(py, sizes, series_len, y, u)?;
        let opts = extract_far_options(bwp, numpoints, Some(false))?;
        let inner = nonlinearity_test(&panel, p, d, &opts, maxboot, seed)?;
        Ok(NonlinearityTest { inner })
    }

    /// The observed nonlinearity statistic.
    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic
    }

    /// The bootstrap p-value.
    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.p_value
    }

    /// Per-replicate bootstrap statistics; `None` marks failed replicates.
    #[getter]
    pub fn boot_stats(&self) -> Vec<Option<f64>> {
        self.inner.boot_stats.clone()
    }
}

/// Rolling-origin accumulated prediction error of a FAR(p, d) candidate.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (sizes, series_len, y, u, p = 1, d = 1, horizon = 1, folds = 1, bwp = None,
                 numpoints = None),
    text_signature = "(sizes, series_len, y, u, /, p=1, d=1, horizon=1, folds=1, bwp=0.1, \
                      numpoints=50)"
)]
pub fn ape<'py>(
    py: Python<'py>, sizes: Vec<usize>, series_len: usize, y: &Bound<'py, PyAny>,
    u: &Bound<'py, PyAny>, p: usize, d: usize, horizon: usize, folds: usize, bwp: Option<f64>,
    numpoints: Option<usize>,
) -> PyResult<f64> {
    let panel = extract_panel_data(py, sizes, series_len, y, u)?;
    let opts = extract_far_options(bwp, numpoints, Some(false))?;
    Ok(crate::evaluation::ape(&panel, p, d, horizon, folds, &opts)?)
}

/// _mxfar — PyO3 module initializer for the Python extension.
///
/// Creates the `functional_models` and `statistical_tests` submodules,
/// attaches them to the parent `_mxfar` module, and registers them in
/// `sys.modules` so they are importable via dotted paths.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _mxfar<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let functional_models_mod = PyModule::new(_py, "functional_models")?;
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    functional_models(_py, m, &functional_models_mod)?;
    statistical_tests_py(_py, m, &statistical_tests_mod)?;
    m.add_function(wrap_pyfunction!(ape, m)?)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("mxfar.functional_models", functional_models_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("mxfar.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn functional_models<'py>(
    _py: Python, mxfar: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<FAR>()?;
    m.add_class::<MXFAR>()?;
    mxfar.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests_py<'py>(
    _py: Python, mxfar: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<NonlinearityTest>()?;
    mxfar.add_submodule(m)?;
    Ok(())
}
