//! `wavecal` library crate.
//!
//! The binary (`wavecal`) is a thin wrapper around this library so that:
//!
//! - the numeric calibration pipeline is testable without an interactive
//!   environment (no prompts, no terminal plots)
//! - modules are reusable (e.g., batch scripts, notebooks)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod hist;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
