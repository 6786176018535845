//! Bootstrap test of functional-coefficient nonlinearity.
//!
//! Purpose
//! -------
//! Decide whether the panel's autoregressive coefficients genuinely vary
//! with the reference signal or whether a constant-coefficient VAR explains
//! the data just as well. Each series is fit both ways on the same trimmed
//! design; the statistic accumulates, over series, how much the VAR's
//! residual sum of squares exceeds the functional fit's:
//!
//! ```text
//! T_obs = Σ_s ( tr(Eᵥₐᵣ,ₛᵀ Eᵥₐᵣ,ₛ) / tr(E_fₐᵣ,ₛᵀ E_fₐᵣ,ₛ) − 1 ).
//! ```
//!
//! Under linearity the ratio hovers near zero; genuine coefficient
//! variation inflates it. The null distribution is approximated by a
//! subject-level residual bootstrap: pseudo-panels are generated from the
//! *linear* fits (so the null holds by construction), refit both ways, and
//! the p-value is the fraction of replicate statistics at least as large as
//! the observed one.
//!
//! Key behaviors
//! -------------
//! - Row alignment: both residual matrices drop `max(p, d)` further
//!   leading rows, and rows whose functional residuals are non-finite
//!   (missing grid cells) are excluded from both sums, so the two traces
//!   always cover the same rows.
//! - Pseudo-series: draw donor subjects with replacement; a pseudo series
//!   keeps its donor's first `max(p, d)` observations and reference
//!   signal, and fills the remaining rows with the donor's VAR fitted
//!   values plus its functional residuals (fitted values alone where the
//!   functional residual row is non-finite).
//! - Replicates run on the rayon pool with per-replicate seeded RNGs, so
//!   results are reproducible for a fixed seed regardless of thread
//!   scheduling.
//! - A failed replicate (singular refit, degenerate ratio) is recorded as
//!   missing and excluded from the p-value denominator; only the loss of
//!   every replicate is an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - `boot_stats.len() == maxboot` always; the p-value divides by the
//!   number of non-missing replicates.
//! - With a fixed `seed`, the statistic, every replicate, and the p-value
//!   are bit-reproducible.
//!
//! Testing notes
//! -------------
//! - Unit tests cover reproducibility and the output contract on small
//!   linear panels; the test's power against curved coefficients is an
//!   integration-test concern.
use crate::functional::core::data::PanelData;
use crate::functional::core::design::LaggedDesign;
use crate::functional::core::options::FarOptions;
use crate::functional::core::shape::FarShape;
use crate::functional::models::FarModel;
use crate::statistical_tests::errors::{NLError, NLResult};
use crate::statistical_tests::validation::validate_test_inputs;
use crate::statistical_tests::var::{VarFit, fit_var};
use ndarray::{Array1, Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

/// Weyl-sequence increment mixing the base seed into decorrelated
/// per-replicate streams.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// NLOutcome — observed statistic, bootstrap draws, and p-value.
///
/// Fields
/// ------
/// - `statistic`: observed sum of per-series trace ratios.
/// - `boot_stats`: one entry per replicate, in replicate order; `None`
///   marks failed replicates.
/// - `p_value`: fraction of non-missing replicates with a statistic at
///   least as large as the observed one.
#[derive(Debug, Clone, PartialEq)]
pub struct NLOutcome {
    pub statistic: f64,
    pub boot_stats: Vec<Option<f64>>,
    pub p_value: f64,
}

/// Run the bootstrap nonlinearity test on a panel.
///
/// Parameters
/// ----------
/// - `panel`: validated panel of uniform-length series.
/// - `p` / `d`: autoregressive order and reference lag under test.
/// - `opts`: estimation options for the functional fits (any fPDC request
///   is ignored here).
/// - `maxboot`: number of bootstrap replicates; ≥ 1.
/// - `seed`: base RNG seed; `None` draws one from the thread RNG, trading
///   reproducibility for independence across calls.
///
/// Returns
/// -------
/// `NLResult<NLOutcome>` with the observed statistic, all replicate
/// statistics, and the bootstrap p-value.
///
/// Errors
/// ------
/// - [`NLError::InvalidBootstrapCount`] / [`NLError::SeriesTooShortForTest`]
///   from configuration validation.
/// - [`NLError::SingularVarSystem`] / [`NLError::Far`] when an *observed*
///   series cannot be fit both ways.
/// - [`NLError::DegenerateStatistic`] when an observed trace ratio is
///   undefined.
/// - [`NLError::AllReplicatesFailed`] when no replicate survives.
pub fn nonlinearity_test(
    panel: &PanelData, p: usize, d: usize, opts: &FarOptions, maxboot: usize, seed: Option<u64>,
) -> NLResult<NLOutcome> {
    let shape = FarShape::new(p, d, panel.series_len)?;
    validate_test_inputs(&shape, maxboot)?;
    let fit_opts = FarOptions { compute_fpdc: false, ..*opts };

    // Observed fits, kept around: the bootstrap reuses the VAR fitted
    // values and functional residuals as its generative ingredients.
    let n_series = panel.n_series();
    let mut fits = Vec::with_capacity(n_series);
    for s in 0..n_series {
        let design = LaggedDesign::build(panel.series_y(s), panel.series_u(s), &shape);
        let var = fit_var(&design)?;
        let far = FarModel::new(p, d, fit_opts).estimate(&panel.series_data(s))?;
        fits.push(SubjectFit { var, far_residuals: far.residuals });
    }

    let mut statistic = 0.0;
    for fit in &fits {
        statistic += trace_ratio(fit.var.residuals.view(), fit.far_residuals.view(), shape.trim())
            .ok_or(NLError::DegenerateStatistic)?;
    }

    let base = seed.unwrap_or_else(rand::random);
    let boot_stats: Vec<Option<f64>> = (0..maxboot)
        .into_par_iter()
        .map(|b| {
            let mut rng = StdRng::seed_from_u64(base ^ (b as u64).wrapping_mul(SEED_MIX));
            let donors: Vec<usize> = (0..n_series).map(|_| rng.gen_range(0..n_series)).collect();
            replicate_statistic(panel, &shape, &fit_opts, &fits, &donors)
        })
        .collect();

    let survivors: Vec<f64> = boot_stats.iter().flatten().copied().collect();
    if survivors.is_empty() {
        return Err(NLError::AllReplicatesFailed);
    }
    let exceed = survivors.iter().filter(|&&t| t >= statistic).count();
    let p_value = exceed as f64 / survivors.len() as f64;

    Ok(NLOutcome { statistic, boot_stats, p_value })
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Observed per-series material reused by the bootstrap generator.
struct SubjectFit {
    var: VarFit,
    far_residuals: Array2<f64>,
}

/// Trace ratio of one series over the aligned residual rows, or `None`
/// when no usable row remains or the functional trace vanishes.
fn trace_ratio(
    var_resid: ArrayView2<'_, f64>, far_resid: ArrayView2<'_, f64>, extra_trim: usize,
) -> Option<f64> {
    let mut var_trace = 0.0;
    let mut far_trace = 0.0;
    let mut rows = 0usize;
    for r in extra_trim..var_resid.nrows() {
        let far_row = far_resid.row(r);
        if far_row.iter().all(|v| v.is_finite()) {
            far_trace += far_row.iter().map(|v| v * v).sum::<f64>();
            var_trace += var_resid.row(r).iter().map(|v| v * v).sum::<f64>();
            rows += 1;
        }
    }
    (rows > 0 && far_trace > 0.0).then(|| var_trace / far_trace - 1.0)
}

/// One bootstrap replicate: generate a pseudo-panel under the linear null
/// and recompute the statistic; `None` on any refit failure.
fn replicate_statistic(
    panel: &PanelData, shape: &FarShape, opts: &FarOptions, fits: &[SubjectFit], donors: &[usize],
) -> Option<f64> {
    let t_len = panel.series_len;
    let k = panel.dim();
    let m = shape.trim();
    let n_series = donors.len();

    let mut y = Array2::zeros((n_series * t_len, k));
    let mut u = Array1::zeros(n_series * t_len);
    for (j, &donor) in donors.iter().enumerate() {
        let donor_y = panel.series_y(donor);
        let donor_u = panel.series_u(donor);
        let offset = j * t_len;
        for t in 0..t_len {
            u[offset + t] = donor_u[t];
        }
        for t in 0..m {
            for c in 0..k {
                y[[offset + t, c]] = donor_y[[t, c]];
            }
        }
        let fit = &fits[donor];
        for r in 0..t_len - m {
            let finite = fit.far_residuals.row(r).iter().all(|v| v.is_finite());
            for c in 0..k {
                let resid = if finite { fit.far_residuals[[r, c]] } else { 0.0 };
                y[[offset + m + r, c]] = fit.var.fitted[[r, c]] + resid;
            }
        }
    }
    // Finite by construction (donor prefixes, fitted values, finite
    // residuals), so validation is skipped.
    let pseudo = PanelData { sizes: panel.sizes.clone(), series_len: t_len, y, u };

    let mut statistic = 0.0;
    for s in 0..n_series {
        let design = LaggedDesign::build(pseudo.series_y(s), pseudo.series_u(s), shape);
        let var = fit_var(&design).ok()?;
        let far = FarModel::new(shape.p, shape.d, *opts).estimate(&pseudo.series_data(s)).ok()?;
        statistic +=
            trace_ratio(var.residuals.view(), far.residuals.view(), shape.trim())?;
    }
    Some(statistic)
}
