//! evaluation::ape — rolling-origin accumulated prediction error.
//!
//! Purpose
//! -------
//! Score a FAR(p, d) specification by out-of-sample prediction: for each
//! series and each fold, refit the single-series model on a truncated
//! prefix, predict the next `horizon` points one step at a time, and
//! accumulate the squared prediction errors. Lower is better; sweeping
//! this over candidate `(p, d)` pairs or bandwidths is the intended
//! selection loop.
//!
//! Key behaviors
//! -------------
//! - Fold `q` (1-based) trains on the first `Tlength − q·horizon` points
//!   and predicts the `horizon` points immediately after the training
//!   window, so every fold's evaluation block is genuinely out of sample.
//! - The bandwidth proportion is inflated per fold by the sample-size
//!   correction `(Tlength / T_train)^{1/5}`, keeping the effective amount
//!   of smoothing comparable across training windows.
//! - Prediction lags are taken from the *full* series (they are in the
//!   training window's past or the evaluation block itself), while the
//!   coefficient lookup uses the truncated fit's own grid and field.
//! - Missing-aware: predictions that land in missing grid cells contribute
//!   nothing to the error sum; only a series with no finite prediction at
//!   all is an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - The deepest training window must retain at least one design row;
//!   validated up front so all folds of all series are well defined.
//!
//! Downstream usage
//! ----------------
//! - Order / bandwidth selection ahead of a final
//!   [`crate::functional::models::MxfarModel`] fit.
//!
//! Testing notes
//! -------------
//! - Unit tests cover fold-depth validation and the near-zero score on
//!   noise-free linear data; discrimination between candidate orders is an
//!   integration-test concern.
use crate::evaluation::errors::{ApeError, ApeResult};
use crate::functional::core::data::{FarData, PanelData};
use crate::functional::core::options::FarOptions;
use crate::functional::core::shape::FarShape;
use crate::functional::models::FarModel;
use ndarray::{Array1, ArrayView1, ArrayView2, s};

/// Accumulated prediction error of a FAR(p, d) specification over a panel.
///
/// Parameters
/// ----------
/// - `panel`: validated panel; every series is scored independently with
///   the single-series model (the grouping plays no role here).
/// - `p` / `d`: candidate autoregressive order and reference lag.
/// - `horizon`: number of points predicted per fold; ≥ 1.
/// - `folds`: number of rolling folds per series; ≥ 1.
/// - `opts`: estimation options; `bwp` is the proportion for the *full*
///   series length and is rescaled per fold.
///
/// Returns
/// -------
/// `ApeResult<f64>`
///   The mean over series of each series's accumulated squared prediction
///   error, summed across folds, horizons, and response dimensions.
///
/// Errors
/// ------
/// - [`ApeError::InvalidHorizon`] / [`ApeError::InvalidFoldCount`] for
///   zero configuration values.
/// - [`ApeError::FoldTooDeep`] when the deepest training window retains no
///   design row.
/// - [`ApeError::NoFinitePredictions`] when a series contributes no finite
///   fold prediction at all.
/// - [`ApeError::Far`] when a per-fold refit rejects its derived input
///   (e.g. a truncated reference signal with a degenerate range).
pub fn ape(
    panel: &PanelData, p: usize, d: usize, horizon: usize, folds: usize, opts: &FarOptions,
) -> ApeResult<f64> {
    if horizon == 0 {
        return Err(ApeError::InvalidHorizon(horizon));
    }
    if folds == 0 {
        return Err(ApeError::InvalidFoldCount(folds));
    }
    let t_len = panel.series_len;
    let shape = FarShape::new(p, d, t_len)?;
    let deepest = t_len.saturating_sub(folds * horizon);
    if deepest <= shape.trim() {
        return Err(ApeError::FoldTooDeep {
            series_len: t_len,
            folds,
            horizon,
            trim: shape.trim(),
        });
    }

    let mut total = 0.0;
    for sidx in 0..panel.n_series() {
        total += series_ape(panel.series_y(sidx), panel.series_u(sidx), p, d, horizon, folds, opts)?;
    }
    Ok(total / panel.n_series() as f64)
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Accumulated squared rolling-origin prediction error of one series.
fn series_ape(
    y: ArrayView2<'_, f64>, u: ArrayView1<'_, f64>, p: usize, d: usize, horizon: usize,
    folds: usize, opts: &FarOptions,
) -> ApeResult<f64> {
    let t_len = y.nrows();
    let k = y.ncols();
    let mut sse = 0.0;
    let mut count = 0usize;

    for q in 1..=folds {
        let train_len = t_len - q * horizon;
        let train = FarData {
            y: y.slice(s![..train_len, ..]).to_owned(),
            u: u.slice(s![..train_len]).to_owned(),
        };

        // Sample-size bandwidth correction; constructed directly because
        // the corrected proportion may legitimately exceed 1.
        let corrected = FarOptions {
            bwp: opts.bwp * (t_len as f64 / train_len as f64).powf(0.2),
            numpoints: opts.numpoints,
            compute_fpdc: false,
        };
        let fit = FarModel::new(p, d, corrected).estimate(&train)?;

        for h in 0..horizon {
            let t = train_len + h;
            let mut lags = Array1::zeros(k * p);
            for lag in 1..=p {
                for c in 0..k {
                    lags[(lag - 1) * k + c] = y[[t - lag, c]];
                }
            }
            if let Some(prediction) = fit.predict_row(lags.view(), u[t - d]) {
                for c in 0..k {
                    let err = y[[t, c]] - prediction[c];
                    sse += err * err;
                }
                count += k;
            }
        }
    }

    if count == 0 {
        return Err(ApeError::NoFinitePredictions);
    }
    Ok(sse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rand_distr::StandardNormal;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Configuration validation (horizon, folds, fold depth).
    // - A near-zero score on noise-free linear data.
    // - A finite, nonnegative score on a noisy panel.
    // - Accumulation of the error sum across folds.
    //
    // They intentionally DO NOT cover:
    // - Order discrimination between candidate (p, d) pairs (integration
    //   tests).
    // -------------------------------------------------------------------------

    /// One-series panel of seeded Gaussian AR(1) data.
    fn ar1_panel(a: f64, t_len: usize, seed: u64) -> PanelData {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut y = Array2::zeros((t_len, 1));
        let mut u = Array1::zeros(t_len);
        let mut prev = 0.0_f64;
        for t in 0..t_len {
            let eps: f64 = rng.sample(StandardNormal);
            prev = a * prev + eps;
            y[[t, 0]] = prev;
            u[t] = rng.sample(StandardNormal);
        }
        PanelData::new(vec![1], t_len, y, u).expect("panel should validate")
    }

    #[test]
    // Purpose
    // -------
    // Verify that zero and over-deep configurations are rejected before any
    // fitting happens.
    //
    // Given
    // -----
    // - A 200-point series with horizon 0, folds 0, and 10 folds of
    //   horizon 20 (deepest training window empty).
    //
    // Expect
    // ------
    // - The matching `ApeError` variant in each case.
    fn ape_rejects_invalid_fold_configurations() {
        // Arrange
        let panel = ar1_panel(0.4, 200, 3);
        let opts = FarOptions::default();

        // Act & Assert
        assert_eq!(ape(&panel, 1, 1, 0, 4, &opts).unwrap_err(), ApeError::InvalidHorizon(0));
        assert_eq!(ape(&panel, 1, 1, 25, 0, &opts).unwrap_err(), ApeError::InvalidFoldCount(0));
        assert_eq!(
            ape(&panel, 1, 1, 20, 10, &opts).unwrap_err(),
            ApeError::FoldTooDeep { series_len: 200, folds: 10, horizon: 20, trim: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // On noise-free linear data every fold refit is exact, so the
    // accumulated prediction error must vanish.
    //
    // Given
    // -----
    // - y[t] = 0.6·y[t−1] with a well-spread reference signal, 2 folds of
    //   horizon 10.
    //
    // Expect
    // ------
    // - APE below 1e-12.
    fn ape_vanishes_on_noise_free_linear_data() {
        // Arrange
        let t_len = 300;
        let mut y = Array2::zeros((t_len, 1));
        y[[0, 0]] = 1.0;
        for t in 1..t_len {
            y[[t, 0]] = 0.6 * y[[t - 1, 0]];
        }
        let u = Array1::from_iter((0..t_len).map(|t| (t as f64 * 0.61).sin()));
        let panel = PanelData::new(vec![1], t_len, y, u).expect("panel should validate");
        let opts = FarOptions::new(0.3, 10, false).expect("valid options");

        // Act
        let score = ape(&panel, 1, 1, 10, 2, &opts).expect("ape should succeed");

        // Assert
        assert!(score < 1e-12, "noise-free APE {score} should vanish");
    }

    #[test]
    // Purpose
    // -------
    // Sanity-check the score on noisy data: finite and nonnegative.
    //
    // Given
    // -----
    // - A 400-point AR(1) series, 4 folds of horizon 25.
    //
    // Expect
    // ------
    // - A finite score ≥ 0.
    fn ape_is_finite_and_nonnegative_on_noisy_data() {
        // Arrange
        let panel = ar1_panel(0.5, 400, 11);
        let opts = FarOptions::new(0.2, 20, false).expect("valid options");

        // Act
        let score = ape(&panel, 1, 1, 25, 4, &opts).expect("ape should succeed");

        // Assert
        assert!(score.is_finite() && score >= 0.0, "score {score} should be finite and ≥ 0");
    }

    #[test]
    // Purpose
    // -------
    // Verify that the per-series score accumulates across folds instead of
    // averaging: adding folds of comparable error must grow the total.
    //
    // Given
    // -----
    // - The same noisy AR(1) series scored with 1 and 3 folds of
    //   horizon 25.
    //
    // Expect
    // ------
    // - The 3-fold score exceeds twice the 1-fold score (the shallowest
    //   fold is shared; two more folds of similar error are added on top).
    fn ape_accumulates_error_across_folds() {
        // Arrange
        let panel = ar1_panel(0.5, 400, 11);
        let opts = FarOptions::new(0.2, 20, false).expect("valid options");

        // Act
        let one_fold = ape(&panel, 1, 1, 25, 1, &opts).expect("ape should succeed");
        let three_folds = ape(&panel, 1, 1, 25, 3, &opts).expect("ape should succeed");

        // Assert
        assert!(
            three_folds > 2.0 * one_fold,
            "3-fold score {three_folds} should accumulate well beyond the 1-fold score {one_fold}"
        );
    }
}
