//! Model order (p, d) for functional-coefficient autoregressions.
//!
//! - `p`: number of **autoregressive lags** (coefficient blocks on past y's).
//! - `d`: **reference lag** — the coefficient functions are evaluated at
//!   `u[t − d]`, the reference-signal value at decision time.
//!
//! Both must be ≥ 1, and trimming `max(p, d)` observations must leave at
//! least one usable design row.
use crate::functional::errors::{FarError, FarResult};

/// Order of the FAR(p, d) / MXFAR(p, d) model, validated against the series
/// length it will be fit to.
///
/// Invariant: `p ≥ 1`, `d ≥ 1`, `max(p, d) < t_len`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarShape {
    pub p: usize,
    pub d: usize,
    t_len: usize,
}

impl FarShape {
    /// Construct a [`FarShape`] = FAR(p, d) and validate it against the
    /// per-series sample size `t_len`.
    ///
    /// # Invariants
    /// - `p ≥ 1`: at least one lag block, otherwise there is nothing to
    ///   estimate.
    /// - `d ≥ 1`: the reference signal is read strictly in the past.
    /// - `max(p, d) < t_len`: at least one design row survives trimming.
    ///
    /// # Errors
    /// - [`FarError::InvalidOrder`] if `p == 0`.
    /// - [`FarError::InvalidReferenceLag`] if `d == 0`.
    /// - [`FarError::SeriesTooShort`] if `max(p, d) >= t_len`.
    ///
    /// # Rationale
    /// The design construction drops the first `max(p, d)` time points of
    /// every series so that all lagged predictors and the lagged reference
    /// value exist. Guarding here fails fast on under-identified
    /// specifications so downstream code can assume `retained() >= 1`.
    pub fn new(p: usize, d: usize, t_len: usize) -> FarResult<Self> {
        if p == 0 {
            return Err(FarError::InvalidOrder(p));
        }
        if d == 0 {
            return Err(FarError::InvalidReferenceLag(d));
        }
        let trim = p.max(d);
        if trim >= t_len {
            return Err(FarError::SeriesTooShort { t_len, trim });
        }
        Ok(FarShape { p, d, t_len })
    }

    /// Per-series sample size this shape was validated against.
    pub fn t_len(&self) -> usize {
        self.t_len
    }

    /// Number of leading observations dropped per series: `max(p, d)`.
    pub fn trim(&self) -> usize {
        self.p.max(self.d)
    }

    /// Number of design rows retained per series: `t_len − max(p, d)`.
    pub fn retained(&self) -> usize {
        self.t_len - self.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation of (p, d) against the sample size.
    // - The trim / retained row arithmetic.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure invalid (p, d, t_len) combinations are rejected with the
    // matching error variant.
    //
    // Given
    // -----
    // - p = 0, d = 0, and max(p, d) >= t_len configurations.
    //
    // Expect
    // ------
    // - Each returns the corresponding `FarError`.
    fn far_shape_new_rejects_invalid_configurations() {
        // Act & Assert
        assert_eq!(FarShape::new(0, 2, 100).unwrap_err(), FarError::InvalidOrder(0));
        assert_eq!(FarShape::new(1, 0, 100).unwrap_err(), FarError::InvalidReferenceLag(0));
        assert_eq!(
            FarShape::new(3, 5, 5).unwrap_err(),
            FarError::SeriesTooShort { t_len: 5, trim: 5 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify trim and retained-row arithmetic for p < d and p > d.
    //
    // Given
    // -----
    // - FAR(1, 2) on 500 observations and FAR(3, 1) on 100 observations.
    //
    // Expect
    // ------
    // - trim = max(p, d) and retained = t_len − trim in both cases.
    fn far_shape_trim_and_retained_follow_max_of_p_and_d() {
        // Arrange
        let a = FarShape::new(1, 2, 500).expect("FAR(1, 2) should be valid for 500 observations");
        let b = FarShape::new(3, 1, 100).expect("FAR(3, 1) should be valid for 100 observations");

        // Assert
        assert_eq!(a.trim(), 2);
        assert_eq!(a.retained(), 498);
        assert_eq!(b.trim(), 3);
        assert_eq!(b.retained(), 97);
    }
}
