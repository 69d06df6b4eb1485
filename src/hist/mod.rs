//! Histogram accumulators for the two analysis passes.
//!
//! - [`Occupancy2D`]: full-resolution hit map used to locate the illuminated
//!   line spatially (first pass)
//! - [`Spectrum1D`]: band-filtered, sub-pixel histogram along the dispersion
//!   axis (second pass)

pub mod occupancy;
pub mod spectrum;

pub use occupancy::*;
pub use spectrum::*;
