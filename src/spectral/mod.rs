//! spectral — frequency-domain connectivity diagnostics.
//!
//! Purpose
//! -------
//! Turn estimated autoregressive coefficient blocks into partial directed
//! coherence (PDC) arrays, and coefficient *fields* into functional PDC
//! (fPDC): one PDC array per grid cell, describing how directed influence
//! between series varies with the reference signal.
//!
//! Key behaviors
//! -------------
//! - [`pdc`] maps one coefficient block (stacked or per-lag layout) to a
//!   `K × K × |freqs|` coherence array.
//! - [`fpdc`] maps a whole coefficient field cell-wise, preserving missing
//!   cells.
//! - [`fourier_frequencies`] supplies the default frequency set
//!   `{1/T, …, ⌊T/2⌋/T}`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every PDC entry lies in `[0, 1]`; squared entries sum to one down each
//!   nonzero column of the spectral transfer matrix.
//!
//! Downstream usage
//! ----------------
//! - Invoked by the model façades when `compute_fpdc` is requested, and
//!   available directly for fitted VAR coefficients.
//!
//! Testing notes
//! -------------
//! - Unit tests live with `pdc`; integration tests exercise fPDC through
//!   the model façades.

pub mod errors;
pub mod pdc;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SpectralError, SpectralResult};
pub use self::pdc::{ArCoefficients, FpdcField, fourier_frequencies, fpdc, pdc};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{SpectralError, SpectralResult};
    pub use super::pdc::{ArCoefficients, FpdcField, fourier_frequencies, fpdc, pdc};
}
