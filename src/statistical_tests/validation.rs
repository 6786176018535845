//! Input validation for the nonlinearity test.
//!
//! Centralizes the fatal preconditions so the test body can assume a
//! well-posed problem: a positive replicate count and series long enough to
//! survive the statistic's double trim.
use crate::functional::core::shape::FarShape;
use crate::statistical_tests::errors::{NLError, NLResult};

/// Validate the test configuration against the panel's series length.
///
/// # Errors
/// - [`NLError::InvalidBootstrapCount`] if `maxboot == 0`.
/// - [`NLError::SeriesTooShortForTest`] if `series_len ≤ 2·max(p, d)`:
///   the residual comparison drops `max(p, d)` rows at design construction
///   and `max(p, d)` more when aligning the two residual sets, so shorter
///   series leave nothing to compare.
pub(crate) fn validate_test_inputs(shape: &FarShape, maxboot: usize) -> NLResult<()> {
    if maxboot == 0 {
        return Err(NLError::InvalidBootstrapCount(maxboot));
    }
    let needed = 2 * shape.trim();
    if shape.t_len() <= needed {
        return Err(NLError::SeriesTooShortForTest { series_len: shape.t_len(), needed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Rejection of zero replicate counts and doubly-trimmed-away series.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify both fatal preconditions and a passing configuration.
    //
    // Given
    // -----
    // - FAR(2, 1) shapes over series of length 4 (too short) and 100, with
    //   maxboot 0 and 250.
    //
    // Expect
    // ------
    // - Matching errors for the bad inputs; Ok for the good pair.
    fn validate_test_inputs_enforces_replicates_and_double_trim() {
        // Arrange
        let short = FarShape::new(2, 1, 4).expect("shape itself is valid");
        let long = FarShape::new(2, 1, 100).expect("shape itself is valid");

        // Act & Assert
        assert_eq!(
            validate_test_inputs(&long, 0).unwrap_err(),
            NLError::InvalidBootstrapCount(0)
        );
        assert_eq!(
            validate_test_inputs(&short, 250).unwrap_err(),
            NLError::SeriesTooShortForTest { series_len: 4, needed: 4 }
        );
        assert!(validate_test_inputs(&long, 250).is_ok());
    }
}
