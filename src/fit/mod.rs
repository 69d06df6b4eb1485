//! Calibration fitting stages.
//!
//! Responsibilities:
//!
//! - locate the illuminated line spatially (`profile`)
//! - detect emission peaks in the spectral histogram (`peaks`)
//! - match peaks to known lines and regress the calibration (`matcher`)

pub mod matcher;
pub mod peaks;
pub mod profile;

pub use matcher::*;
pub use peaks::*;
pub use profile::*;
