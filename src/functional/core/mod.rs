//! functional::core — data containers, grid, designs, and coefficient arenas.
//!
//! Purpose
//! -------
//! Collect the structural building blocks shared by every estimation path:
//! validated series / panel containers, the quantile-bounded evaluation
//! grid with its cell-assignment rule, trimmed lagged designs, the model
//! order, estimation options, and the grid-indexed coefficient arenas that
//! hold per-cell estimates.
//!
//! Key behaviors
//! -------------
//! - [`data`] validates inputs once so every downstream consumer can assume
//!   finite, shape-consistent arrays.
//! - [`grid`] owns the `numpoints + 1` evaluation-point convention and the
//!   right-closed cell boundaries used by all row routing.
//! - [`design`] builds the shared response / lag-predictor / reference
//!   buffers per series (and stacked per panel).
//! - [`shape`] / [`options`] carry the validated (p, d) order and the
//!   bandwidth / resolution / fPDC configuration.
//! - [`field`] stores per-cell estimates as explicit `Option` values so
//!   local failures stay contained.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything here is pure data plumbing: no estimation, no randomness,
//!   no I/O. All numerical work lives in `functional::estimators` and the
//!   model façades.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own invariants; end-to-end
//!   behavior is exercised by the model and integration tests.

pub mod data;
pub mod design;
pub mod field;
pub mod grid;
pub mod options;
pub mod shape;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{FarData, PanelData};
pub use self::design::{LaggedDesign, PanelDesign};
pub use self::field::{CoefficientField, MixedCoefficientField, MixedCoefficients};
pub use self::grid::SignalGrid;
pub use self::options::FarOptions;
pub use self::shape::FarShape;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mxfar::functional::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::data::{FarData, PanelData};
    pub use super::design::{LaggedDesign, PanelDesign};
    pub use super::field::{CoefficientField, MixedCoefficientField, MixedCoefficients};
    pub use super::grid::SignalGrid;
    pub use super::options::FarOptions;
    pub use super::shape::FarShape;
}
