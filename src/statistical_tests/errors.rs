//! statistical_tests::errors — error types for the nonlinearity test.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the bootstrap nonlinearity
//! test, covering malformed configurations, degenerate observed fits, and
//! wholesale bootstrap failure. Per-replicate failures are NOT errors: a
//! failed replicate is recorded as a missing bootstrap statistic and only
//! the loss of *every* replicate aborts the test.
//!
//! Conventions
//! -----------
//! - Same design as the estimation-side errors: hand-rolled enum, `Display`
//!   messages phrased as domain constraints, transparent wrapping of fit
//!   errors, PyO3 bridge behind `python-bindings`.
use crate::functional::errors::FarError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type NLResult<T> = Result<T, NLError>;

/// NLError — failures of the observed-statistic fit or the test setup.
///
/// Variants
/// --------
/// - `InvalidBootstrapCount(b)` — at least one bootstrap replicate is
///   required.
/// - `SeriesTooShortForTest { series_len, needed }` — the statistic trims
///   `max(p, d)` rows twice (design construction, then residual
///   alignment), so each series must be longer than `2·max(p, d)`.
/// - `SingularVarSystem` — the intercept-free VAR fit of an *observed*
///   series has a singular normal-equation system.
/// - `DegenerateStatistic` — an observed series contributes no usable
///   residual row, or its functional residual sum of squares is zero, so
///   the trace ratio is undefined.
/// - `AllReplicatesFailed` — every bootstrap replicate failed, leaving no
///   reference distribution for the p-value.
/// - `Far(FarError)` — an observed per-series functional fit rejected its
///   input.
#[derive(Debug, Clone, PartialEq)]
pub enum NLError {
    InvalidBootstrapCount(usize),
    SeriesTooShortForTest { series_len: usize, needed: usize },
    SingularVarSystem,
    DegenerateStatistic,
    AllReplicatesFailed,
    Far(FarError),
}

impl std::error::Error for NLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NLError::Far(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for NLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NLError::InvalidBootstrapCount(b) => {
                write!(f, "Number of bootstrap replicates must be at least 1, got {b}.")
            }
            NLError::SeriesTooShortForTest { series_len, needed } => {
                write!(
                    f,
                    "Series length {series_len} is too short for the nonlinearity test: the \
                     doubly trimmed residual comparison needs more than {needed} observations \
                     per series."
                )
            }
            NLError::SingularVarSystem => {
                write!(f, "Singular normal equations in the baseline VAR fit of an observed series.")
            }
            NLError::DegenerateStatistic => {
                write!(
                    f,
                    "Undefined trace ratio: an observed series has no usable residual row or a \
                     zero functional residual sum of squares."
                )
            }
            NLError::AllReplicatesFailed => {
                write!(f, "Every bootstrap replicate failed; no reference distribution available.")
            }
            NLError::Far(err) => write!(f, "Observed functional fit failed: {err}"),
        }
    }
}

impl From<FarError> for NLError {
    fn from(err: FarError) -> Self {
        NLError::Far(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<NLError> for PyErr {
    fn from(err: NLError) -> PyErr {
        PyValueError::new_err(format!("NLError: {err}"))
    }
}
