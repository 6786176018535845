//! functional::errors — shared error types for the estimation stack.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used across the functional
//! coefficient estimation stack (data containers, grid construction, lagged
//! designs, point estimators, and the FAR / MXFAR model façades), together
//! with a conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`FarResult`] and [`FarError`] as the canonical result and error
//!   types for estimation-side validation and runtime failures.
//! - Separate *fatal* input-shape errors (mismatched dimensions, invalid
//!   orders, degenerate reference signals) from *contained* local-estimation
//!   failures (`InsufficientLocalSupport`, `SingularLocalSystem`) that the
//!   grid sweep downgrades to missing cells rather than propagating.
//! - Attach human-readable `Display` messages to each variant so diagnostics
//!   are meaningful without additional context.
//! - Implement `From<FarError> for PyErr` to surface Rust-side failures as
//!   `ValueError` instances to Python callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimation modules validate their inputs (lengths, finiteness, orders,
//!   bandwidth and grid-resolution ranges) and return [`FarResult<T>`]
//!   instead of panicking.
//! - `FarError` values are small, cheap to clone, and suitable for use in
//!   unit tests and higher-level orchestration code.
//!
//! Conventions
//! -----------
//! - This module covers estimation-side errors only; diagnostic subtrees
//!   (`spectral`, `evaluation`, `statistical_tests`) define their own error
//!   enums and wrap [`FarError`] where they re-enter the estimation stack.
//! - Error messages are phrased in terms of domain constraints (e.g.
//!   "bandwidth proportion must lie in (0, 1]") rather than low-level
//!   implementation details.
//!
//! Downstream usage
//! ----------------
//! - Grid construction, design building, and model estimation return
//!   [`FarResult<T>`] to propagate fatal failures cleanly to callers.
//! - The grid sweep in `functional::estimators` catches
//!   `InsufficientLocalSupport` / `SingularLocalSystem` per evaluation point
//!   and records the affected cell as missing instead of failing the fit.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that each variant's `Display` message embeds its
//!   payload (offending value, index, or dimension) so failures can be
//!   traced back to the offending input.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type FarResult<T> = Result<T, FarError>;

/// FarError — error conditions for the functional estimation stack.
///
/// Purpose
/// -------
/// Represent all validation and computation failures that can occur while
/// building data containers, grids, and lagged designs, and while running
/// local-linear point estimation.
///
/// Variants
/// --------
/// Fatal input-shape errors (reported immediately, no partial result):
/// - `EmptySeries` — an observation matrix or reference signal has no rows.
/// - `NonFiniteObservation { row, col, value }` — an entry of `y` is NaN or
///   ±∞.
/// - `NonFiniteSignal { index, value }` — an entry of `u` is NaN or ±∞.
/// - `LengthMismatch { y_rows, u_len }` — `y` and `u` disagree on the number
///   of time points.
/// - `PanelShapeMismatch { expected_rows, y_rows, u_len }` — the stacked
///   panel does not match `Σ group_sizes × series_len`.
/// - `EmptyGroups` / `EmptyGroup { group }` — the group partition is empty
///   or contains a zero-size group.
/// - `InvalidOrder(p)` / `InvalidReferenceLag(d)` — autoregressive order or
///   reference lag of zero.
/// - `SeriesTooShort { t_len, trim }` — no rows survive trimming
///   `max(p, d)` observations.
/// - `InvalidBandwidth(bwp)` — bandwidth proportion outside `(0, 1]`.
/// - `InvalidGridResolution(numpoints)` — fewer than two cut points.
/// - `DegenerateSignalRange { lower, upper }` — the 5th and 95th empirical
///   percentiles of the reference signal coincide.
///
/// Contained local-estimation failures (downgraded to missing cells by the
/// grid sweep):
/// - `InsufficientLocalSupport { needed, available }` — too few observations
///   receive positive kernel weight at a grid point.
/// - `SingularLocalSystem` — the weighted Gram matrix has no Cholesky
///   factorization.
///
/// Notes
/// -----
/// - Implements [`std::error::Error`] and [`std::fmt::Display`] for
///   idiomatic `?`-based propagation.
/// - A `From<FarError> for PyErr` implementation maps all cases to
///   `ValueError` at the Python boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FarError {
    //------ Input validation errors (fatal) ------
    EmptySeries,
    NonFiniteObservation { row: usize, col: usize, value: f64 },
    NonFiniteSignal { index: usize, value: f64 },
    LengthMismatch { y_rows: usize, u_len: usize },
    PanelShapeMismatch { expected_rows: usize, y_rows: usize, u_len: usize },
    EmptyGroups,
    EmptyGroup { group: usize },
    InvalidOrder(usize),
    InvalidReferenceLag(usize),
    SeriesTooShort { t_len: usize, trim: usize },
    InvalidBandwidth(f64),
    InvalidGridResolution(usize),
    DegenerateSignalRange { lower: f64, upper: f64 },
    //------ Local estimation failures (contained) ------
    InsufficientLocalSupport { needed: usize, available: usize },
    SingularLocalSystem,
}

impl std::error::Error for FarError {}

impl std::fmt::Display for FarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FarError::EmptySeries => {
                write!(f, "Series is empty: need at least one observation row.")
            }
            FarError::NonFiniteObservation { row, col, value } => {
                write!(
                    f,
                    "Non-finite observation y[{row}, {col}] = {value}. All entries must be finite."
                )
            }
            FarError::NonFiniteSignal { index, value } => {
                write!(
                    f,
                    "Non-finite reference-signal value u[{index}] = {value}. All entries must be \
                     finite."
                )
            }
            FarError::LengthMismatch { y_rows, u_len } => {
                write!(
                    f,
                    "Observation matrix has {y_rows} rows but reference signal has {u_len} \
                     entries; the two must agree."
                )
            }
            FarError::PanelShapeMismatch { expected_rows, y_rows, u_len } => {
                write!(
                    f,
                    "Stacked panel expects {expected_rows} rows (Σ group sizes × series length) \
                     but got y with {y_rows} rows and u with {u_len} entries."
                )
            }
            FarError::EmptyGroups => {
                write!(f, "Group partition is empty: need at least one group.")
            }
            FarError::EmptyGroup { group } => {
                write!(f, "Group {group} has size zero; every group must contain a series.")
            }
            FarError::InvalidOrder(p) => {
                write!(f, "Invalid autoregressive order p = {p}. Must satisfy p ≥ 1.")
            }
            FarError::InvalidReferenceLag(d) => {
                write!(f, "Invalid reference lag d = {d}. Must satisfy d ≥ 1.")
            }
            FarError::SeriesTooShort { t_len, trim } => {
                write!(
                    f,
                    "Series of length {t_len} leaves no usable rows after trimming \
                     max(p, d) = {trim} observations."
                )
            }
            FarError::InvalidBandwidth(bwp) => {
                write!(f, "Invalid bandwidth proportion bwp = {bwp}. Must lie in (0, 1].")
            }
            FarError::InvalidGridResolution(numpoints) => {
                write!(
                    f,
                    "Invalid grid resolution numpoints = {numpoints}. Must satisfy numpoints ≥ 2."
                )
            }
            FarError::DegenerateSignalRange { lower, upper } => {
                write!(
                    f,
                    "Degenerate reference-signal range [{lower}, {upper}]: the 5th and 95th \
                     percentiles must differ."
                )
            }
            FarError::InsufficientLocalSupport { needed, available } => {
                write!(
                    f,
                    "Insufficient local support: {available} observations with positive kernel \
                     weight, but the local system needs at least {needed}."
                )
            }
            FarError::SingularLocalSystem => {
                write!(f, "Weighted local least-squares system is singular.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<FarError> for PyErr {
    fn from(err: FarError) -> PyErr {
        PyValueError::new_err(format!("FarError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting for FarError variants.
    // - Embedding of payload values (indices, dimensions, offending values)
    //   into error messages.
    //
    // They intentionally DO NOT cover:
    // - The `From<FarError> for PyErr` conversion, since exercising it
    //   requires linking against the Python C API and is better handled by
    //   Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that shape-mismatch variants embed all three payload values in
    // their `Display` output.
    //
    // Given
    // -----
    // - A `PanelShapeMismatch` with expected_rows = 200, y_rows = 180,
    //   u_len = 200.
    //
    // Expect
    // ------
    // - The message contains "200" and "180".
    fn far_error_panel_shape_mismatch_includes_payload_in_display() {
        // Arrange
        let err = FarError::PanelShapeMismatch { expected_rows: 200, y_rows: 180, u_len: 200 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("200"), "message should include expected rows.\nGot: {msg}");
        assert!(msg.contains("180"), "message should include actual rows.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidBandwidth` reports the offending proportion.
    //
    // Given
    // -----
    // - An `InvalidBandwidth` with bwp = 1.5.
    //
    // Expect
    // ------
    // - The message contains "1.5".
    fn far_error_invalid_bandwidth_includes_payload_in_display() {
        // Arrange
        let err = FarError::InvalidBandwidth(1.5);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("1.5"), "message should include offending bwp.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that the contained local-estimation variants have non-empty
    // messages, since they surface in logs when cells go missing.
    //
    // Given
    // -----
    // - `InsufficientLocalSupport` and `SingularLocalSystem` values.
    //
    // Expect
    // ------
    // - Both `Display` messages are non-empty; the support variant embeds
    //   both counts.
    fn far_error_local_failures_have_informative_display_messages() {
        // Arrange
        let support = FarError::InsufficientLocalSupport { needed: 10, available: 3 };
        let singular = FarError::SingularLocalSystem;

        // Act
        let support_msg = support.to_string();
        let singular_msg = singular.to_string();

        // Assert
        assert!(support_msg.contains("10") && support_msg.contains('3'));
        assert!(!singular_msg.trim().is_empty());
    }
}
