//! Estimation options shared by the FAR and MXFAR model façades.
//!
//! Bundles the bandwidth proportion, grid resolution, and the optional
//! frequency-domain (fPDC) post-processing flag into a single configuration
//! object with validated construction and sensible defaults.
use crate::functional::errors::{FarError, FarResult};

/// FarOptions — configuration for grid-based functional estimation.
///
/// Purpose
/// -------
/// Carry the tuning knobs of a FAR / MXFAR fit in one place so model
/// façades, the cross-validator, and the nonlinearity test all thread the
/// same configuration type.
///
/// Fields
/// ------
/// - `bwp`: `f64`
///   Bandwidth proportion in `(0, 1]`. The absolute kernel bandwidth is
///   `bwp × range(u)` over the reference series being fit. The rolling
///   cross-validator rescales this internally by the usual
///   `(T / T_train)^{1/5}` sample-size correction, which may push the
///   effective proportion above 1; only user-supplied values are range
///   checked.
/// - `numpoints`: `usize`
///   Grid resolution: number of cut points. The evaluation grid always has
///   `numpoints + 1` points. Must be ≥ 2.
/// - `compute_fpdc`: `bool`
///   When `true`, the model façades additionally compute the functional
///   partial directed coherence of the estimated field at the Fourier
///   frequencies `k/T`, `k = 1..⌊T/2⌋`.
///
/// Invariants
/// ----------
/// - Values produced by [`FarOptions::new`] satisfy `0 < bwp ≤ 1` and
///   `numpoints ≥ 2`.
///
/// Notes
/// -----
/// - Fields are public so internal code (e.g. the cross-validator's
///   per-fold bandwidth correction) can derive adjusted copies without
///   re-validating; external callers should prefer [`FarOptions::new`] or
///   [`FarOptions::default`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarOptions {
    /// Bandwidth proportion in (0, 1].
    pub bwp: f64,
    /// Number of grid cut points (evaluation grid has `numpoints + 1` points).
    pub numpoints: usize,
    /// Whether to compute fPDC arrays alongside the fit.
    pub compute_fpdc: bool,
}

impl FarOptions {
    /// Construct validated [`FarOptions`].
    ///
    /// # Errors
    /// - [`FarError::InvalidBandwidth`] if `bwp` is non-finite or outside
    ///   `(0, 1]`.
    /// - [`FarError::InvalidGridResolution`] if `numpoints < 2`.
    pub fn new(bwp: f64, numpoints: usize, compute_fpdc: bool) -> FarResult<Self> {
        if !bwp.is_finite() || bwp <= 0.0 || bwp > 1.0 {
            return Err(FarError::InvalidBandwidth(bwp));
        }
        if numpoints < 2 {
            return Err(FarError::InvalidGridResolution(numpoints));
        }
        Ok(FarOptions { bwp, numpoints, compute_fpdc })
    }
}

impl Default for FarOptions {
    /// Default configuration: `bwp = 0.1`, `numpoints = 50`, no fPDC.
    fn default() -> Self {
        FarOptions { bwp: 0.1, numpoints: 50, compute_fpdc: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Range validation of bwp and numpoints.
    // - The documented defaults.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure out-of-range bandwidths and grid resolutions are rejected.
    //
    // Given
    // -----
    // - bwp values 0.0, 1.5, NaN and numpoints values 0 and 1.
    //
    // Expect
    // ------
    // - Each returns the matching `FarError` variant.
    fn far_options_new_rejects_out_of_range_values() {
        // Act & Assert
        assert!(matches!(FarOptions::new(0.0, 50, false), Err(FarError::InvalidBandwidth(_))));
        assert!(matches!(FarOptions::new(1.5, 50, false), Err(FarError::InvalidBandwidth(_))));
        assert!(matches!(FarOptions::new(f64::NAN, 50, false), Err(FarError::InvalidBandwidth(_))));
        assert!(matches!(FarOptions::new(0.1, 1, false), Err(FarError::InvalidGridResolution(1))));
    }

    #[test]
    // Purpose
    // -------
    // Verify the documented defaults.
    //
    // Expect
    // ------
    // - bwp = 0.1, numpoints = 50, compute_fpdc = false.
    fn far_options_default_matches_documented_values() {
        // Act
        let opts = FarOptions::default();

        // Assert
        assert_eq!(opts, FarOptions { bwp: 0.1, numpoints: 50, compute_fpdc: false });
    }
}
