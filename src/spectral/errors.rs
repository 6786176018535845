//! spectral::errors — error types for the PDC / fPDC transforms.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the frequency-domain
//! transforms, covering malformed coefficient inputs. Runtime numerical
//! issues do not occur here: the transform is a closed-form map over finite
//! inputs.
//!
//! Conventions
//! -----------
//! - Mirrors the estimation-side error design: a hand-rolled enum with
//!   `Display` messages phrased as domain constraints, plus a PyO3 bridge
//!   behind the `python-bindings` feature.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SpectralResult<T> = Result<T, SpectralError>;

/// SpectralError — invalid coefficient inputs to PDC / fPDC.
///
/// Variants
/// --------
/// - `EmptyCoefficients` — no lag matrices were supplied.
/// - `StackedShapeMismatch { rows, cols }` — a stacked `K × K·p` matrix
///   whose column count is not a positive multiple of its row count.
/// - `LagShapeMismatch { lag, rows, cols }` — lag matrix `lag` is not
///   square or disagrees with the first lag's dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralError {
    EmptyCoefficients,
    StackedShapeMismatch { rows: usize, cols: usize },
    LagShapeMismatch { lag: usize, rows: usize, cols: usize },
}

impl std::error::Error for SpectralError {}

impl std::fmt::Display for SpectralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectralError::EmptyCoefficients => {
                write!(f, "No coefficient matrices supplied: need at least one lag.")
            }
            SpectralError::StackedShapeMismatch { rows, cols } => {
                write!(
                    f,
                    "Stacked coefficient matrix is {rows}×{cols}; columns must be a positive \
                     multiple of rows (K × K·p)."
                )
            }
            SpectralError::LagShapeMismatch { lag, rows, cols } => {
                write!(
                    f,
                    "Lag matrix {lag} is {rows}×{cols}; every lag must be square with the same \
                     dimension as lag 0."
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SpectralError> for PyErr {
    fn from(err: SpectralError) -> PyErr {
        PyValueError::new_err(format!("SpectralError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Payload embedding in `Display` messages.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that shape-mismatch variants report their dimensions.
    //
    // Given
    // -----
    // - A `StackedShapeMismatch` with rows = 2, cols = 5.
    //
    // Expect
    // ------
    // - The message contains both dimensions.
    fn spectral_error_stacked_mismatch_includes_dimensions_in_display() {
        // Arrange
        let err = SpectralError::StackedShapeMismatch { rows: 2, cols: 5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('2') && msg.contains('5'), "message should embed dims.\nGot: {msg}");
    }
}
