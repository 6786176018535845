//! Kernel weight function for local-linear estimation.
//!
//! The estimation stack uses the Epanechnikov kernel throughout: compactly
//! supported, so observations outside one bandwidth of the evaluation point
//! receive exactly zero weight and "insufficient local support" is a
//! well-defined, detectable failure rather than a numerically vanishing
//! one.

/// Epanechnikov kernel `K(z) = 0.75 (1 − z²)` on `|z| < 1`, zero outside.
///
/// # Arguments
/// - `z`: standardized distance `(u − u0) / h`.
///
/// # Notes
/// - Strictly positive on the open support, continuous at the boundary.
#[inline]
pub(crate) fn epanechnikov(z: f64) -> f64 {
    if z.abs() < 1.0 { 0.75 * (1.0 - z * z) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Peak value, symmetry, and compact support of the kernel.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the kernel's basic shape: peak 0.75 at zero, symmetric, zero at
    // and beyond the support boundary.
    //
    // Expect
    // ------
    // - K(0) = 0.75, K(z) = K(−z), K(±1) = 0, K(2) = 0.
    fn epanechnikov_has_expected_shape() {
        // Act & Assert
        assert!((epanechnikov(0.0) - 0.75).abs() < 1e-15);
        assert_eq!(epanechnikov(0.5), epanechnikov(-0.5));
        assert_eq!(epanechnikov(1.0), 0.0);
        assert_eq!(epanechnikov(-1.0), 0.0);
        assert_eq!(epanechnikov(2.0), 0.0);
    }
}
