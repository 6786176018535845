//! functional::core::data — validated series and panel containers.
//!
//! Purpose
//! -------
//! Provide the input containers consumed by the estimation stack: a single
//! multivariate series paired with its reference signal ([`FarData`]), and a
//! stacked panel of series partitioned into homogeneous groups
//! ([`PanelData`]). Both types centralize basic input checks so downstream
//! code can assume clean, shape-consistent, finite data.
//!
//! Key behaviors
//! -------------
//! - Store observations as `ndarray` matrices with rows indexing time and
//!   columns indexing the `K` response dimensions.
//! - Enforce non-emptiness, finiteness, and length agreement between `y`
//!   and `u` at construction time.
//! - For panels, enforce the stacked-layout invariant
//!   `rows(y) = len(u) = Σ group_sizes × series_len` and expose per-series
//!   views that respect series order and per-series time ordering.
//!
//! Invariants & assumptions
//! ------------------------
//! - All entries of `y` and `u` are finite.
//! - Panel series all share the same length `series_len`; unequal subject
//!   lengths are not supported (the bootstrap's residual-offset indexing
//!   relies on this, so it is a hard precondition rather than a silent
//!   generalization).
//! - Containers are read-only to the estimation stack: estimation borrows
//!   them and never mutates.
//!
//! Conventions
//! -----------
//! - Series `s` in a panel occupies rows `s·series_len .. (s+1)·series_len`
//!   of the stacked arrays; series are numbered group by group in the order
//!   the group sizes are given.
//! - Group and series indices are 0-based throughout.
//!
//! Downstream usage
//! ----------------
//! - [`FarData`] feeds `FarModel::estimate`; [`PanelData`] feeds
//!   `MxfarModel::estimate`, the cross-validator, and the nonlinearity test,
//!   all of which iterate per-series views.
//!
//! Testing notes
//! -------------
//! - Unit tests cover rejection of empty, non-finite, and shape-mismatched
//!   inputs, and the per-series view arithmetic of [`PanelData`].
use crate::functional::errors::{FarError, FarResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// FarData — a single multivariate series with its reference signal.
///
/// Purpose
/// -------
/// Hold one length-`T`, `K`-dimensional observation sequence together with
/// the scalar reference-signal sequence that drives the functional
/// coefficients.
///
/// Fields
/// ------
/// - `y`: `Array2<f64>`
///   Observations, `T × K`; every entry finite.
/// - `u`: `Array1<f64>`
///   Reference signal, length `T`; every entry finite.
///
/// Invariants
/// ----------
/// - `y.nrows() == u.len() > 0`.
/// - All entries of `y` and `u` are finite.
///
/// Notes
/// -----
/// - Validation is O(T·K); after construction this is a plain container
///   with no hidden allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct FarData {
    /// Observations, rows = time, columns = response dimensions.
    pub y: Array2<f64>,
    /// Reference signal, one value per time point.
    pub u: Array1<f64>,
}

impl FarData {
    /// Construct a validated [`FarData`] instance.
    ///
    /// Parameters
    /// ----------
    /// - `y`: `Array2<f64>`
    ///   Observation matrix, `T × K`. Must be non-empty with finite entries.
    /// - `u`: `Array1<f64>`
    ///   Reference signal of length `T`. Must have finite entries.
    ///
    /// Returns
    /// -------
    /// `FarResult<FarData>`
    ///   - `Ok(FarData)` if all invariants are satisfied.
    ///   - `Err(FarError)` if validation fails.
    ///
    /// Errors
    /// ------
    /// - [`FarError::EmptySeries`] when `y` has no rows or no columns.
    /// - [`FarError::LengthMismatch`] when `y.nrows() != u.len()`.
    /// - [`FarError::NonFiniteObservation`] / [`FarError::NonFiniteSignal`]
    ///   when an entry is NaN or ±∞ (the first offender is reported).
    pub fn new(y: Array2<f64>, u: Array1<f64>) -> FarResult<Self> {
        if y.nrows() == 0 || y.ncols() == 0 {
            return Err(FarError::EmptySeries);
        }
        if y.nrows() != u.len() {
            return Err(FarError::LengthMismatch { y_rows: y.nrows(), u_len: u.len() });
        }
        validate_finite(y.view(), u.view())?;
        Ok(FarData { y, u })
    }

    /// Number of time points `T`.
    pub fn t_len(&self) -> usize {
        self.y.nrows()
    }

    /// Response dimension `K`.
    pub fn dim(&self) -> usize {
        self.y.ncols()
    }
}

/// PanelData — a stacked group of series for mixed-effects estimation.
///
/// Purpose
/// -------
/// Hold `N = Σ group_sizes` series of uniform length `series_len`, stacked
/// row-wise in series order, with the group partition needed by the
/// mixed-effects point estimator and the subject-level bootstrap.
///
/// Fields
/// ------
/// - `sizes`: `Vec<usize>`
///   Group sizes; `sizes[j]` series belong to group `j`. All nonzero.
/// - `series_len`: `usize`
///   Uniform per-series length `Tlength`.
/// - `y`: `Array2<f64>`
///   Stacked observations, `(N · series_len) × K`.
/// - `u`: `Array1<f64>`
///   Stacked reference signal, length `N · series_len`.
///
/// Invariants
/// ----------
/// - `sizes` is non-empty with strictly positive entries.
/// - `y.nrows() == u.len() == N · series_len` with `series_len > 0`.
/// - All entries finite.
///
/// Notes
/// -----
/// - Uniform `series_len` is a hard precondition (see module docs); the
///   constructor rejects anything else by construction of the shape check.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    /// Group sizes (number of series per group).
    pub sizes: Vec<usize>,
    /// Uniform per-series length.
    pub series_len: usize,
    /// Stacked observations, `(N · series_len) × K`.
    pub y: Array2<f64>,
    /// Stacked reference signal, length `N · series_len`.
    pub u: Array1<f64>,
}

impl PanelData {
    /// Construct a validated [`PanelData`] instance.
    ///
    /// Parameters
    /// ----------
    /// - `sizes`: `Vec<usize>`
    ///   Group sizes; must be non-empty with strictly positive entries.
    /// - `series_len`: `usize`
    ///   Uniform per-series length; must be positive.
    /// - `y`: `Array2<f64>`
    ///   Stacked observation matrix, `(Σ sizes · series_len) × K`.
    /// - `u`: `Array1<f64>`
    ///   Stacked reference signal of matching length.
    ///
    /// Returns
    /// -------
    /// `FarResult<PanelData>`
    ///
    /// Errors
    /// ------
    /// - [`FarError::EmptyGroups`] / [`FarError::EmptyGroup`] for a missing
    ///   or zero-size group.
    /// - [`FarError::EmptySeries`] when `series_len == 0` or `y` has no
    ///   columns.
    /// - [`FarError::PanelShapeMismatch`] when the stacked dimensions do not
    ///   match `Σ sizes × series_len`.
    /// - [`FarError::NonFiniteObservation`] / [`FarError::NonFiniteSignal`]
    ///   for NaN or ±∞ entries.
    pub fn new(
        sizes: Vec<usize>, series_len: usize, y: Array2<f64>, u: Array1<f64>,
    ) -> FarResult<Self> {
        if sizes.is_empty() {
            return Err(FarError::EmptyGroups);
        }
        if let Some(group) = sizes.iter().position(|&n| n == 0) {
            return Err(FarError::EmptyGroup { group });
        }
        if series_len == 0 || y.ncols() == 0 {
            return Err(FarError::EmptySeries);
        }
        let expected_rows = sizes.iter().sum::<usize>() * series_len;
        if y.nrows() != expected_rows || u.len() != expected_rows {
            return Err(FarError::PanelShapeMismatch {
                expected_rows,
                y_rows: y.nrows(),
                u_len: u.len(),
            });
        }
        validate_finite(y.view(), u.view())?;
        Ok(PanelData { sizes, series_len, y, u })
    }

    /// Total number of series `N = Σ sizes`.
    pub fn n_series(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Number of groups `g`.
    pub fn n_groups(&self) -> usize {
        self.sizes.len()
    }

    /// Response dimension `K`.
    pub fn dim(&self) -> usize {
        self.y.ncols()
    }

    /// Group index of series `s` under the group-by-group numbering.
    ///
    /// # Panics
    /// - Panics if `s >= n_series()`; series indices come from iteration
    ///   over `0..n_series()` in all internal callers.
    pub fn group_of(&self, s: usize) -> usize {
        let mut remaining = s;
        for (group, &size) in self.sizes.iter().enumerate() {
            if remaining < size {
                return group;
            }
            remaining -= size;
        }
        panic!("series index {s} out of range for {} series", self.n_series());
    }

    /// View of series `s`'s observation rows.
    pub fn series_y(&self, s: usize) -> ArrayView2<'_, f64> {
        let start = s * self.series_len;
        self.y.slice(s![start..start + self.series_len, ..])
    }

    /// View of series `s`'s reference-signal values.
    pub fn series_u(&self, s: usize) -> ArrayView1<'_, f64> {
        let start = s * self.series_len;
        self.u.slice(s![start..start + self.series_len])
    }

    /// Owned copy of series `s` as a standalone [`FarData`].
    ///
    /// Used by the per-subject fits in the cross-validator and the
    /// nonlinearity test; validation is skipped because the panel's own
    /// invariants already guarantee it would pass.
    pub fn series_data(&self, s: usize) -> FarData {
        FarData { y: self.series_y(s).to_owned(), u: self.series_u(s).to_owned() }
    }
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Scan `y` and `u` for the first non-finite entry, if any.
#[inline]
fn validate_finite(y: ArrayView2<'_, f64>, u: ArrayView1<'_, f64>) -> FarResult<()> {
    for ((row, col), &value) in y.indexed_iter() {
        if !value.is_finite() {
            return Err(FarError::NonFiniteObservation { row, col, value });
        }
    }
    for (index, &value) in u.indexed_iter() {
        if !value.is_finite() {
            return Err(FarError::NonFiniteSignal { index, value });
        }
    }
    Ok(())
}
