//! evaluation::errors — error types for rolling-origin prediction error.
//!
//! Conventions
//! -----------
//! - Same design as the estimation-side errors: hand-rolled enum, `Display`
//!   messages phrased as domain constraints, transparent wrapping of the
//!   underlying fit errors, PyO3 bridge behind `python-bindings`.
use crate::functional::errors::FarError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ApeResult<T> = Result<T, ApeError>;

/// ApeError — invalid cross-validation configuration or unusable folds.
///
/// Variants
/// --------
/// - `InvalidHorizon(r)` — prediction horizon must be ≥ 1.
/// - `InvalidFoldCount(q)` — number of folds must be ≥ 1.
/// - `FoldTooDeep { series_len, folds, horizon, trim }` — the deepest
///   training window `Tlength − folds·horizon` leaves no usable design row.
/// - `NoFinitePredictions` — every fold prediction landed in a missing
///   grid cell, so no squared error could be accumulated.
/// - `Far(FarError)` — a per-fold refit failed on malformed derived input.
#[derive(Debug, Clone, PartialEq)]
pub enum ApeError {
    InvalidHorizon(usize),
    InvalidFoldCount(usize),
    FoldTooDeep { series_len: usize, folds: usize, horizon: usize, trim: usize },
    NoFinitePredictions,
    Far(FarError),
}

impl std::error::Error for ApeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApeError::Far(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApeError::InvalidHorizon(r) => {
                write!(f, "Prediction horizon must be at least 1, got {r}.")
            }
            ApeError::InvalidFoldCount(q) => {
                write!(f, "Number of folds must be at least 1, got {q}.")
            }
            ApeError::FoldTooDeep { series_len, folds, horizon, trim } => {
                write!(
                    f,
                    "With {folds} folds of horizon {horizon}, the deepest training window of a \
                     length-{series_len} series retains no design row after trimming {trim} \
                     observations."
                )
            }
            ApeError::NoFinitePredictions => {
                write!(
                    f,
                    "No finite fold predictions: every evaluated point fell in a missing grid \
                     cell."
                )
            }
            ApeError::Far(err) => write!(f, "Per-fold fit failed: {err}"),
        }
    }
}

impl From<FarError> for ApeError {
    fn from(err: FarError) -> Self {
        ApeError::Far(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<ApeError> for PyErr {
    fn from(err: ApeError) -> PyErr {
        PyValueError::new_err(format!("ApeError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Transparent wrapping of fit errors and payload formatting.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the `From<FarError>` bridge and that wrapped messages surface
    // the inner description.
    //
    // Given
    // -----
    // - A `FarError::SingularLocalSystem` converted via `?`-style `From`.
    //
    // Expect
    // ------
    // - The `Far` variant, with the inner message embedded in `Display`.
    fn ape_error_wraps_fit_errors_transparently() {
        // Act
        let err: ApeError = FarError::SingularLocalSystem.into();

        // Assert
        assert_eq!(err, ApeError::Far(FarError::SingularLocalSystem));
        assert!(err.to_string().contains("Per-fold fit failed"));
    }
}
