//! Input/output helpers.
//!
//! - centroid CSV ingest + validation (`ingest`)
//! - calibration CSV / fit JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
