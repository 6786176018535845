//! functional::core::grid — quantile-bounded evaluation grid and cell lookup.
//!
//! Purpose
//! -------
//! Discretize the observed reference signal into the fixed evaluation grid
//! on which the coefficient functions are estimated, and resolve arbitrary
//! scalar reference values into the grid cell whose estimate applies to
//! them.
//!
//! Key behaviors
//! -------------
//! - Bound the grid by the 5th and 95th empirical percentiles of the
//!   reference signal so extreme observations do not stretch the
//!   estimation range.
//! - Split the bounded range into `numpoints` equally spaced cut points and
//!   derive `numpoints + 1` evaluation points: the midpoints of adjacent
//!   cut points plus one linearly extrapolated point at each end.
//! - Assign any finite scalar to exactly one of the `numpoints + 1`
//!   half-open cells `(-∞, c₁], (c₁, c₂], …, (c_numpoints, ∞)`; the cell
//!   index doubles as the index into the evaluation-point and
//!   coefficient-field arrays.
//!
//! Invariants & assumptions
//! ------------------------
//! - `points().len() == cuts().len() + 1 == numpoints + 1`.
//! - Cut points are strictly increasing (guaranteed by the degenerate-range
//!   check at construction).
//! - Cell boundaries are closed on the right; [`SignalGrid::cell_of`] is
//!   monotone non-decreasing in its argument.
//!
//! Conventions
//! -----------
//! - Cell indices are 0-based: `x ≤ c₁` maps to cell 0 and `x > c_last`
//!   maps to cell `numpoints`.
//! - Percentiles use the empirical order statistics of the full signal
//!   passed to [`SignalGrid::build`], not of the trimmed design rows.
//!
//! Downstream usage
//! ----------------
//! - The model façades build one grid per fit, sweep the point estimator
//!   over `points()`, and route every design row through `cell_of` to pick
//!   the coefficient matrix used for its prediction.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the evaluation-point count, right-closed boundary
//!   behavior, monotonicity of the cell index, and rejection of degenerate
//!   (constant) signals.
use crate::functional::errors::{FarError, FarResult};
use ndarray::ArrayView1;
use statrs::statistics::{Data, OrderStatistics};

/// Lower percentile bounding the evaluation range.
const LOWER_PERCENTILE: usize = 5;
/// Upper percentile bounding the evaluation range.
const UPPER_PERCENTILE: usize = 95;

/// SignalGrid — discretized reference-signal grid with cell assignment.
///
/// Purpose
/// -------
/// Hold the `numpoints` cut points partitioning the real line into
/// `numpoints + 1` cells together with the `numpoints + 1` evaluation
/// points at which the coefficient functions are estimated.
///
/// Fields
/// ------
/// - `cuts`: strictly increasing cut points `c₁ < … < c_numpoints` spanning
///   the 5th–95th percentile range of the reference signal.
/// - `points`: evaluation points, one per cell; interior points are
///   midpoints of adjacent cuts, the two boundary points extrapolate by the
///   common cut spacing.
///
/// Invariants
/// ----------
/// - `points.len() == cuts.len() + 1`.
/// - `points` is strictly increasing with uniform spacing equal to the cut
///   spacing.
///
/// Notes
/// -----
/// - Immutable after construction; cloned freely (two small vectors).
#[derive(Debug, Clone, PartialEq)]
pub struct SignalGrid {
    cuts: Vec<f64>,
    points: Vec<f64>,
}

impl SignalGrid {
    /// Build the evaluation grid from an observed reference signal.
    ///
    /// Parameters
    /// ----------
    /// - `u`: `ArrayView1<f64>`
    ///   Reference-signal values; all finite (enforced upstream by the data
    ///   containers).
    /// - `numpoints`: `usize`
    ///   Number of cut points; must be ≥ 2.
    ///
    /// Returns
    /// -------
    /// `FarResult<SignalGrid>` with `numpoints` cuts and `numpoints + 1`
    /// evaluation points.
    ///
    /// Errors
    /// ------
    /// - [`FarError::InvalidGridResolution`] if `numpoints < 2`.
    /// - [`FarError::EmptySeries`] if `u` is empty.
    /// - [`FarError::DegenerateSignalRange`] if the 5th and 95th empirical
    ///   percentiles coincide (constant or near-constant signal).
    ///
    /// Notes
    /// -----
    /// - With cut spacing `Δ = (q₉₅ − q₅) / (numpoints − 1)`, the interior
    ///   evaluation points are `(cᵢ + cᵢ₊₁)/2` and the two boundary points
    ///   extend the midpoint sequence by `Δ` on each side, so every cell —
    ///   including the two unbounded ones — has an evaluation location.
    pub fn build(u: ArrayView1<'_, f64>, numpoints: usize) -> FarResult<Self> {
        if numpoints < 2 {
            return Err(FarError::InvalidGridResolution(numpoints));
        }
        if u.is_empty() {
            return Err(FarError::EmptySeries);
        }

        let mut samples = Data::new(u.to_vec());
        let lower = samples.percentile(LOWER_PERCENTILE);
        let upper = samples.percentile(UPPER_PERCENTILE);
        if !(upper > lower) {
            return Err(FarError::DegenerateSignalRange { lower, upper });
        }

        let spacing = (upper - lower) / (numpoints - 1) as f64;
        let cuts: Vec<f64> = (0..numpoints).map(|i| lower + spacing * i as f64).collect();

        let mut points = Vec::with_capacity(numpoints + 1);
        let first_mid = (cuts[0] + cuts[1]) / 2.0;
        points.push(first_mid - spacing);
        for pair in cuts.windows(2) {
            points.push((pair[0] + pair[1]) / 2.0);
        }
        points.push((cuts[numpoints - 2] + cuts[numpoints - 1]) / 2.0 + spacing);

        Ok(SignalGrid { cuts, points })
    }

    /// Cell index of a scalar reference value.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `f64`
    ///   Scalar reference value; finite by the data-container invariants.
    ///
    /// Returns
    /// -------
    /// The 0-based index in `[0, numpoints]` of the unique half-open cell
    /// `(-∞, c₁], (c₁, c₂], …, (c_numpoints, ∞)` containing `x`. Boundaries
    /// are closed on the right: `x == cᵢ` belongs to cell `i − 1`.
    ///
    /// Notes
    /// -----
    /// - Monotone non-decreasing in `x`, so ordered inputs map to ordered
    ///   cells.
    pub fn cell_of(&self, x: f64) -> usize {
        self.cuts.partition_point(|&c| c < x)
    }

    /// Number of cells (and evaluation points): `numpoints + 1`.
    pub fn n_cells(&self) -> usize {
        self.points.len()
    }

    /// Evaluation points, one per cell, strictly increasing.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Cut points `c₁ < … < c_numpoints`.
    pub fn cuts(&self) -> &[f64] {
        &self.cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The `numpoints + 1` evaluation-point invariant.
    // - Right-closed cell boundaries and the unbounded end cells.
    // - Monotonicity of `cell_of` over a sweep of inputs.
    // - Rejection of constant signals.
    //
    // They intentionally DO NOT cover:
    // - Percentile estimation accuracy (delegated to statrs).
    // -------------------------------------------------------------------------

    fn uniform_signal(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| i as f64 / (n - 1) as f64))
    }

    #[test]
    // Purpose
    // -------
    // Verify the evaluation-point count and uniform spacing for a simple
    // uniform signal.
    //
    // Given
    // -----
    // - 1000 evenly spaced values in [0, 1] and numpoints = 50.
    //
    // Expect
    // ------
    // - 50 cuts, 51 evaluation points, and constant point spacing equal to
    //   the cut spacing.
    fn signal_grid_build_produces_numpoints_plus_one_points() {
        // Arrange
        let u = uniform_signal(1000);

        // Act
        let grid = SignalGrid::build(u.view(), 50).expect("grid should build for uniform signal");

        // Assert
        assert_eq!(grid.cuts().len(), 50);
        assert_eq!(grid.n_cells(), 51);

        let cut_spacing = grid.cuts()[1] - grid.cuts()[0];
        for pair in grid.points().windows(2) {
            assert!(
                (pair[1] - pair[0] - cut_spacing).abs() < 1e-12,
                "evaluation points should be uniformly spaced by the cut spacing"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify right-closed boundaries: a value equal to a cut point belongs
    // to the cell on its left, and values beyond the last cut map to the
    // final cell.
    //
    // Given
    // -----
    // - A grid built from 1000 uniform values with numpoints = 10.
    //
    // Expect
    // ------
    // - `cell_of(c₁) == 0`, `cell_of(c₁ + ε) == 1`, values below the first
    //   cut map to 0, and values above the last cut map to numpoints.
    fn signal_grid_cell_of_is_closed_on_the_right() {
        // Arrange
        let u = uniform_signal(1000);
        let grid = SignalGrid::build(u.view(), 10).expect("grid should build");
        let c1 = grid.cuts()[0];
        let c_last = *grid.cuts().last().unwrap();

        // Act & Assert
        assert_eq!(grid.cell_of(c1), 0);
        assert_eq!(grid.cell_of(c1 + 1e-9), 1);
        assert_eq!(grid.cell_of(c1 - 100.0), 0);
        assert_eq!(grid.cell_of(c_last), grid.n_cells() - 2);
        assert_eq!(grid.cell_of(c_last + 1e-9), grid.n_cells() - 1);
        assert_eq!(grid.cell_of(c_last + 100.0), grid.n_cells() - 1);
    }

    #[test]
    // Purpose
    // -------
    // Check that the cell index is monotone non-decreasing in the input and
    // always lies in [0, numpoints].
    //
    // Given
    // -----
    // - A grid over [0, 1] and a fine sweep of inputs from −1 to 2.
    //
    // Expect
    // ------
    // - Cell indices never decrease along the sweep and stay in range.
    fn signal_grid_cell_of_is_monotone_and_in_range() {
        // Arrange
        let u = uniform_signal(500);
        let grid = SignalGrid::build(u.view(), 25).expect("grid should build");

        // Act & Assert
        let mut prev = 0usize;
        for step in 0..3000 {
            let x = -1.0 + 3.0 * step as f64 / 2999.0;
            let cell = grid.cell_of(x);
            assert!(cell < grid.n_cells(), "cell index out of range for x = {x}");
            assert!(cell >= prev, "cell index decreased at x = {x}");
            prev = cell;
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure a constant reference signal is rejected rather than producing
    // a zero-width grid.
    //
    // Given
    // -----
    // - 100 identical values.
    //
    // Expect
    // ------
    // - `FarError::DegenerateSignalRange`.
    fn signal_grid_build_rejects_constant_signal() {
        // Arrange
        let u = Array1::from_elem(100, 3.25);

        // Act
        let result = SignalGrid::build(u.view(), 50);

        // Assert
        assert!(matches!(result, Err(FarError::DegenerateSignalRange { .. })));
    }
}
