//! spectral::pdc — partial directed coherence of autoregressive
//! coefficients.
//!
//! Purpose
//! -------
//! Map autoregressive coefficient blocks into the frequency domain and
//! compute the partial directed coherence (PDC): a column-normalized
//! magnitude of the spectral transfer matrix
//!
//! ```text
//! A(f)    = I − Σ_{l=1..p} Φ_l · e^{−2πi·f·l},
//! PDC_ij(f) = |A(f)_ij| / sqrt( Σ_m |A(f)_mj|² ),
//! ```
//!
//! so `PDC_ij(f)` measures the directed influence from series `j` to
//! series `i` at frequency `f`, with `Σ_i PDC_ij(f)² = 1` for every
//! nonzero column.
//!
//! Key behaviors
//! -------------
//! - Accept coefficients either as an ordered list of `p` square `K × K`
//!   lag matrices or as one horizontally stacked `K × (K·p)` matrix; both
//!   forms produce identical output.
//! - [`fpdc`] applies the transform independently at every grid cell of a
//!   [`CoefficientField`], preserving missing cells.
//! - [`fourier_frequencies`] produces the default internal frequency set
//!   `{1/T, …, ⌊T/2⌋/T}` (Nyquist range excluding zero).
//!
//! Invariants & assumptions
//! ------------------------
//! - All PDC entries lie in `[0, 1]`; columns of `A(f)` that are entirely
//!   zero yield zero entries (the unit-column-norm property is documented
//!   as holding only for nonzero columns).
//! - Output is `K × K × |freqs|` with the frequency axis last, one such
//!   array per grid cell for [`fpdc`].
//!
//! Conventions
//! -----------
//! - Frequencies are in cycles per sample, so `f = 0.5` is the Nyquist
//!   frequency.
//!
//! Downstream usage
//! ----------------
//! - The model façades call [`fpdc`] on estimated fields when
//!   `compute_fpdc` is set; callers can also invoke [`pdc`] directly on a
//!   fitted VAR coefficient matrix.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the unit-column-norm property, the `[0, 1]` range,
//!   list-vs-stacked invariance, and missing-cell preservation in
//!   [`fpdc`].
use crate::functional::core::field::CoefficientField;
use crate::spectral::errors::{SpectralError, SpectralResult};
use ndarray::{Array2, Array3, ArrayView2, s};
use num_complex::Complex64;
use std::f64::consts::PI;

/// fPDC output: one `K × K × |freqs|` PDC array per grid cell, missing
/// where the underlying coefficient cell is missing.
pub type FpdcField = Vec<Option<Array3<f64>>>;

/// ArCoefficients — autoregressive coefficients in either accepted layout.
///
/// Purpose
/// -------
/// Let callers pass coefficients the way they hold them: as the `p`
/// separate lag matrices of a structural model, or as the horizontally
/// stacked `K × (K·p)` block a fitted field cell stores. [`pdc`] treats
/// both identically.
#[derive(Debug, Clone, PartialEq)]
pub enum ArCoefficients {
    /// One `K × (K·p)` matrix, lag `l` occupying columns `(l−1)·K .. l·K`.
    Stacked(Array2<f64>),
    /// `p` square `K × K` matrices, one per lag, in lag order.
    Lags(Vec<Array2<f64>>),
}

impl ArCoefficients {
    /// Validate the layout and return `(K, p)`.
    ///
    /// Errors
    /// ------
    /// - [`SpectralError::EmptyCoefficients`] for an empty lag list or a
    ///   zero-row stacked matrix.
    /// - [`SpectralError::StackedShapeMismatch`] when the stacked column
    ///   count is not a positive multiple of the row count.
    /// - [`SpectralError::LagShapeMismatch`] when a lag matrix is not
    ///   square with the common dimension.
    pub fn validate(&self) -> SpectralResult<(usize, usize)> {
        match self {
            ArCoefficients::Stacked(phi) => {
                let (rows, cols) = (phi.nrows(), phi.ncols());
                if rows == 0 {
                    return Err(SpectralError::EmptyCoefficients);
                }
                if cols == 0 || cols % rows != 0 {
                    return Err(SpectralError::StackedShapeMismatch { rows, cols });
                }
                Ok((rows, cols / rows))
            }
            ArCoefficients::Lags(lags) => {
                let first = lags.first().ok_or(SpectralError::EmptyCoefficients)?;
                let k = first.nrows();
                if k == 0 {
                    return Err(SpectralError::EmptyCoefficients);
                }
                for (lag, phi) in lags.iter().enumerate() {
                    if phi.nrows() != k || phi.ncols() != k {
                        return Err(SpectralError::LagShapeMismatch {
                            lag,
                            rows: phi.nrows(),
                            cols: phi.ncols(),
                        });
                    }
                }
                Ok((k, lags.len()))
            }
        }
    }

    /// View of lag `l` (1-based) as a `K × K` block.
    fn lag(&self, l: usize, k: usize) -> ArrayView2<'_, f64> {
        match self {
            ArCoefficients::Stacked(phi) => phi.slice(s![.., (l - 1) * k..l * k]),
            ArCoefficients::Lags(lags) => lags[l - 1].view(),
        }
    }
}

/// Compute the PDC array of a coefficient block over a frequency set.
///
/// Parameters
/// ----------
/// - `coefficients`: lag coefficients in either layout (see
///   [`ArCoefficients`]).
/// - `freqs`: frequencies in cycles per sample; typically
///   [`fourier_frequencies`] of the fitted series length.
///
/// Returns
/// -------
/// `SpectralResult<Array3<f64>>`
///   A `K × K × |freqs|` array with entries in `[0, 1]`; entry
///   `(i, j, fi)` is the directed coherence from `j` to `i` at
///   `freqs[fi]`.
///
/// Errors
/// ------
/// - Any layout error from [`ArCoefficients::validate`].
pub fn pdc(coefficients: &ArCoefficients, freqs: &[f64]) -> SpectralResult<Array3<f64>> {
    let (k, p) = coefficients.validate()?;
    let mut out = Array3::zeros((k, k, freqs.len()));
    let mut transfer = Array2::<Complex64>::zeros((k, k));

    for (fi, &f) in freqs.iter().enumerate() {
        // A(f) = I − Σ_l Φ_l e^{−2πi f l}
        transfer.fill(Complex64::new(0.0, 0.0));
        for i in 0..k {
            transfer[[i, i]] = Complex64::new(1.0, 0.0);
        }
        for l in 1..=p {
            let phase = Complex64::from_polar(1.0, -2.0 * PI * f * l as f64);
            let phi_l = coefficients.lag(l, k);
            for i in 0..k {
                for j in 0..k {
                    transfer[[i, j]] -= phase * phi_l[[i, j]];
                }
            }
        }

        for j in 0..k {
            let norm: f64 =
                (0..k).map(|m| transfer[[m, j]].norm_sqr()).sum::<f64>().sqrt();
            if norm > 0.0 {
                for i in 0..k {
                    out[[i, j, fi]] = transfer[[i, j]].norm() / norm;
                }
            }
        }
    }
    Ok(out)
}

/// Apply [`pdc`] independently at every grid cell of a coefficient field.
///
/// Parameters
/// ----------
/// - `field`: estimated coefficient field; populated cells hold stacked
///   `K × (K·p)` matrices.
/// - `freqs`: frequencies in cycles per sample.
///
/// Returns
/// -------
/// `SpectralResult<FpdcField>` with one entry per grid cell in grid order;
/// missing coefficient cells stay missing.
pub fn fpdc(field: &CoefficientField, freqs: &[f64]) -> SpectralResult<FpdcField> {
    field
        .iter()
        .map(|cell| {
            cell.map(|phi| pdc(&ArCoefficients::Stacked(phi.clone()), freqs)).transpose()
        })
        .collect()
}

/// Default internal frequency set `{1/T, …, ⌊T/2⌋/T}` for a series of
/// length `t_len` (Nyquist range excluding zero).
pub fn fourier_frequencies(t_len: usize) -> Vec<f64> {
    (1..=t_len / 2).map(|j| j as f64 / t_len as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The unit-column-norm property and the [0, 1] range.
    // - List-vs-stacked layout invariance.
    // - Missing-cell preservation in `fpdc`.
    // - The Fourier frequency helper.
    //
    // They intentionally DO NOT cover:
    // - Interpretation of PDC on estimated fields (integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that squared PDC entries sum to one down every column at
    // every frequency, and that all entries lie in [0, 1].
    //
    // Given
    // -----
    // - A bivariate VAR(2) coefficient stack and five frequencies.
    //
    // Expect
    // ------
    // - `Σ_i PDC(i, j, f)² = 1` to 1e-12 for every (j, f); entries in
    //   [0, 1].
    fn pdc_columns_have_unit_squared_norm() {
        // Arrange
        let phi = array![[0.5, 0.1, -0.2, 0.0], [0.3, -0.4, 0.1, 0.2]];
        let freqs = [0.05, 0.1, 0.2, 0.35, 0.5];

        // Act
        let out = pdc(&ArCoefficients::Stacked(phi), &freqs).expect("pdc should succeed");

        // Assert
        for fi in 0..freqs.len() {
            for j in 0..2 {
                let col_norm: f64 = (0..2).map(|i| out[[i, j, fi]].powi(2)).sum();
                assert!(
                    (col_norm - 1.0).abs() < 1e-12,
                    "column ({j}, {fi}) squared norm {col_norm} should be 1"
                );
            }
        }
        for &v in out.iter() {
            assert!((0.0..=1.0).contains(&v), "entry {v} out of [0, 1]");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that passing lag matrices as a list or as the equivalent
    // stacked matrix yields identical output.
    //
    // Given
    // -----
    // - A bivariate VAR(2): Φ₁, Φ₂ as a list, and [Φ₁ | Φ₂] stacked.
    //
    // Expect
    // ------
    // - Elementwise equality of the two PDC arrays.
    fn pdc_is_invariant_to_coefficient_layout() {
        // Arrange
        let phi1 = array![[0.5, 0.1], [0.3, -0.4]];
        let phi2 = array![[-0.2, 0.0], [0.1, 0.2]];
        let stacked = array![[0.5, 0.1, -0.2, 0.0], [0.3, -0.4, 0.1, 0.2]];
        let freqs = fourier_frequencies(20);

        // Act
        let from_lags = pdc(&ArCoefficients::Lags(vec![phi1, phi2]), &freqs)
            .expect("list layout should succeed");
        let from_stacked =
            pdc(&ArCoefficients::Stacked(stacked), &freqs).expect("stacked layout should succeed");

        // Assert
        assert_eq!(from_lags.shape(), from_stacked.shape());
        for (a, b) in from_lags.iter().zip(from_stacked.iter()) {
            assert!((a - b).abs() < 1e-15, "layouts disagree: {a} vs {b}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify layout validation errors.
    //
    // Given
    // -----
    // - An empty lag list, a 2×5 stacked matrix, and a non-square lag.
    //
    // Expect
    // ------
    // - The matching `SpectralError` variant for each.
    fn pdc_rejects_malformed_coefficient_layouts() {
        // Arrange
        let freqs = [0.1];

        // Act & Assert
        assert_eq!(
            pdc(&ArCoefficients::Lags(vec![]), &freqs).unwrap_err(),
            SpectralError::EmptyCoefficients
        );
        assert_eq!(
            pdc(&ArCoefficients::Stacked(Array2::zeros((2, 5))), &freqs).unwrap_err(),
            SpectralError::StackedShapeMismatch { rows: 2, cols: 5 }
        );
        assert_eq!(
            pdc(
                &ArCoefficients::Lags(vec![Array2::zeros((2, 2)), Array2::zeros((2, 3))]),
                &freqs
            )
            .unwrap_err(),
            SpectralError::LagShapeMismatch { lag: 1, rows: 2, cols: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `fpdc` preserves missing cells and transforms present
    // ones.
    //
    // Given
    // -----
    // - A two-cell field with the second cell missing.
    //
    // Expect
    // ------
    // - Output has one `Some` with shape (K, K, |freqs|) and one `None`.
    fn fpdc_preserves_missing_cells() {
        // Arrange
        let field = CoefficientField::from_cells(vec![
            Some(array![[0.5, 0.1], [0.3, -0.4]]),
            None,
        ]);
        let freqs = [0.1, 0.25];

        // Act
        let out = fpdc(&field, &freqs).expect("fpdc should succeed");

        // Assert
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_ref().map(|a| a.shape().to_vec()), Some(vec![2, 2, 2]));
        assert!(out[1].is_none());
    }

    #[test]
    // Purpose
    // -------
    // Pin the default internal frequency set.
    //
    // Given
    // -----
    // - Series lengths 10 and 9.
    //
    // Expect
    // ------
    // - `{1/10, …, 5/10}` and `{1/9, …, 4/9}` respectively.
    fn fourier_frequencies_cover_nyquist_range_excluding_zero() {
        // Act
        let even = fourier_frequencies(10);
        let odd = fourier_frequencies(9);

        // Assert
        assert_eq!(even, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(odd.len(), 4);
        assert!((odd[3] - 4.0 / 9.0).abs() < 1e-15);
    }
}
