//! Mathematical utilities: least squares and the Gaussian profile model.

pub mod gaussian;
pub mod ols;

pub use gaussian::*;
pub use ols::*;
