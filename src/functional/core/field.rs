//! functional::core::field — grid-indexed coefficient arenas.
//!
//! Purpose
//! -------
//! Store the coefficient matrices estimated at every grid evaluation point
//! as a fixed-size arena: one cell per grid position, always allocated,
//! each holding an explicit `Option` so failed local estimates stay visibly
//! missing instead of propagating sentinel values through arithmetic.
//!
//! Key behaviors
//! -------------
//! - [`CoefficientField`]: one optional `K × K·p` matrix per cell (single
//!   series, or a materialized per-group / per-subject slice of a mixed
//!   fit).
//! - [`MixedCoefficientField`]: per cell, the per-group mean blocks and
//!   per-subject deviation blocks returned by the mixed-effects point
//!   estimator, plus lookups that compose a subject's *effective* matrix
//!   (its group mean + its own deviation).
//! - Materialization helpers (`mean_field`, `subject_field`) that flatten a
//!   mixed field into plain [`CoefficientField`]s for the spectral
//!   diagnostics, which operate on one matrix per cell.
//!
//! Invariants & assumptions
//! ------------------------
//! - The cell count is fixed at `numpoints + 1` by construction and never
//!   changes afterwards; fields are immutable once built.
//! - Within a populated mixed cell, `mean.len()` equals the group count and
//!   `deviation.len()` equals the subject count of the fit that produced
//!   it; all matrices share the same `K × K·p` shape.
//!
//! Conventions
//! -----------
//! - Cell indices come from [`crate::functional::core::grid::SignalGrid::cell_of`]
//!   and are 0-based.
//!
//! Downstream usage
//! ----------------
//! - The model façades fill fields from the grid sweep and read them back
//!   row by row for predictions; `spectral::fpdc` maps them cell-wise into
//!   PDC arrays.
//!
//! Testing notes
//! -------------
//! - Unit tests cover missing-cell accounting and the mean + deviation
//!   composition of subject matrices.
use ndarray::Array2;

/// CoefficientField — one optional coefficient matrix per grid cell.
///
/// Purpose
/// -------
/// Arena of `numpoints + 1` cells; cell `i` holds the `K × K·p` coefficient
/// matrix estimated at evaluation point `i`, or `None` where local
/// estimation failed.
///
/// Invariants
/// ----------
/// - `n_cells()` is fixed at construction; populated cells all share one
///   `K × K·p` shape.
///
/// Notes
/// -----
/// - Missing cells are an expected, contained outcome: rows routed to them
///   yield missing predictions, never a panic or an abort.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientField {
    cells: Vec<Option<Array2<f64>>>,
}

impl CoefficientField {
    /// Wrap the per-cell sweep results into a field.
    pub(crate) fn from_cells(cells: Vec<Option<Array2<f64>>>) -> Self {
        CoefficientField { cells }
    }

    /// Number of grid cells, `numpoints + 1`.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Coefficient matrix of cell `i`, if local estimation succeeded there.
    pub fn cell(&self, i: usize) -> Option<&Array2<f64>> {
        self.cells[i].as_ref()
    }

    /// Number of cells where local estimation failed.
    pub fn n_missing(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Iterator over the cells in grid order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Array2<f64>>> {
        self.cells.iter().map(Option::as_ref)
    }
}

/// MixedCoefficients — one grid cell of a mixed-effects fit.
///
/// Holds the per-group mean coefficient blocks and the per-subject
/// deviation (random-effect offset) blocks estimated at a single grid
/// point, each `K × K·p`.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedCoefficients {
    /// Group-level mean blocks, one per group.
    pub mean: Vec<Array2<f64>>,
    /// Subject-level deviation blocks, one per subject.
    pub deviation: Vec<Array2<f64>>,
}

/// MixedCoefficientField — grid arena for a mixed-effects fit.
///
/// Purpose
/// -------
/// Per cell, the full mean + deviation decomposition; per subject, the
/// effective coefficient matrix is the subject's group mean plus its own
/// deviation. Both the group-mean view and the per-subject view are part of
/// the public surface since downstream diagnostics consume each separately.
///
/// Fields
/// ------
/// - `cells`: one optional [`MixedCoefficients`] per grid position.
/// - `groups`: group index of each subject, fixing the mean block a
///   subject composes with.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedCoefficientField {
    cells: Vec<Option<MixedCoefficients>>,
    groups: Vec<usize>,
}

impl MixedCoefficientField {
    /// Wrap the per-cell sweep results into a mixed field.
    pub(crate) fn from_cells(cells: Vec<Option<MixedCoefficients>>, groups: Vec<usize>) -> Self {
        MixedCoefficientField { cells, groups }
    }

    /// Number of grid cells, `numpoints + 1`.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of subjects covered by the fit.
    pub fn n_subjects(&self) -> usize {
        self.groups.len()
    }

    /// Number of groups covered by the fit.
    pub fn n_groups(&self) -> usize {
        self.groups.iter().copied().max().map_or(0, |g| g + 1)
    }

    /// Full decomposition at cell `i`, if estimation succeeded there.
    pub fn cell(&self, i: usize) -> Option<&MixedCoefficients> {
        self.cells[i].as_ref()
    }

    /// Number of cells where stacked local estimation failed.
    pub fn n_missing(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Group-mean block of `group` at cell `i`.
    pub fn group_mean(&self, i: usize, group: usize) -> Option<&Array2<f64>> {
        self.cells[i].as_ref().map(|c| &c.mean[group])
    }

    /// Deviation block of `subject` at cell `i`.
    pub fn subject_deviation(&self, i: usize, subject: usize) -> Option<&Array2<f64>> {
        self.cells[i].as_ref().map(|c| &c.deviation[subject])
    }

    /// Effective coefficient matrix of `subject` at cell `i`: its group's
    /// mean block plus its own deviation block.
    pub fn subject_matrix(&self, i: usize, subject: usize) -> Option<Array2<f64>> {
        self.cells[i].as_ref().map(|c| &c.mean[self.groups[subject]] + &c.deviation[subject])
    }

    /// Materialize the group-mean curve of `group` as a plain field.
    pub fn mean_field(&self, group: usize) -> CoefficientField {
        CoefficientField::from_cells(
            self.cells.iter().map(|c| c.as_ref().map(|c| c.mean[group].clone())).collect(),
        )
    }

    /// Materialize the effective per-subject curve of `subject` as a plain
    /// field.
    pub fn subject_field(&self, subject: usize) -> CoefficientField {
        CoefficientField::from_cells(
            (0..self.n_cells()).map(|i| self.subject_matrix(i, subject)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Missing-cell accounting in both field types.
    // - The mean + deviation composition behind `subject_matrix` and
    //   `subject_field`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify missing-cell counting and cell access on a small field.
    //
    // Given
    // -----
    // - Three cells with the middle one missing.
    //
    // Expect
    // ------
    // - `n_missing() == 1`; present cells round-trip their matrices.
    fn coefficient_field_tracks_missing_cells() {
        // Arrange
        let field = CoefficientField::from_cells(vec![
            Some(array![[1.0, 2.0]]),
            None,
            Some(array![[3.0, 4.0]]),
        ]);

        // Assert
        assert_eq!(field.n_cells(), 3);
        assert_eq!(field.n_missing(), 1);
        assert_eq!(field.cell(0), Some(&array![[1.0, 2.0]]));
        assert_eq!(field.cell(1), None);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a subject's effective matrix composes its group mean with
    // its own deviation, and that missing cells stay missing through
    // materialization.
    //
    // Given
    // -----
    // - Two subjects in one group; a two-cell field with the second cell
    //   missing.
    //
    // Expect
    // ------
    // - `subject_matrix(0, s)` equals mean + deviation of subject s.
    // - `subject_field(1)` preserves the missing second cell.
    fn mixed_field_subject_matrix_composes_mean_and_deviation() {
        // Arrange
        let cell = MixedCoefficients {
            mean: vec![array![[1.0, 0.0]]],
            deviation: vec![array![[0.5, -0.5]], array![[-0.5, 0.5]]],
        };
        let field = MixedCoefficientField::from_cells(vec![Some(cell), None], vec![0, 0]);

        // Act & Assert: subject / group accounting
        assert_eq!(field.n_subjects(), 2);
        assert_eq!(field.n_groups(), 1);

        // Act & Assert: composition
        assert_eq!(field.subject_matrix(0, 0), Some(array![[1.5, -0.5]]));
        assert_eq!(field.subject_matrix(0, 1), Some(array![[0.5, 0.5]]));
        assert_eq!(field.subject_matrix(1, 0), None);

        // Act & Assert: materialization keeps holes
        let subject_field = field.subject_field(1);
        assert_eq!(subject_field.n_cells(), 2);
        assert_eq!(subject_field.n_missing(), 1);
        assert_eq!(subject_field.cell(0), Some(&array![[0.5, 0.5]]));

        let mean_field = field.mean_field(0);
        assert_eq!(mean_field.cell(0), Some(&array![[1.0, 0.0]]));
    }
}
