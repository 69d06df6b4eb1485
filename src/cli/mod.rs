//! Command-line parsing for the wavelength calibration tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the histogramming/fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    BAND_HALF_WIDTH_SIGMAS, PEAK_FLOOR_DIVISOR, PIXEL_PITCH_M, RESOLUTION_ENHANCEMENT, SENSOR_BINS,
};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wavecal", version, about = "Pixel-to-wavelength calibration from centroid CSVs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calibrate both channels against known emission lines and export the table.
    Calibrate(CalibrateArgs),
    /// Generate a synthetic centroid CSV for testing the pipeline.
    Synth(SynthArgs),
}

/// Options for the calibration run.
#[derive(Debug, Parser, Clone)]
pub struct CalibrateArgs {
    /// Centroid CSV for channel 1 (prompted for interactively when omitted).
    #[arg(long = "ch1", value_name = "CSV")]
    pub ch1: Option<PathBuf>,

    /// Centroid CSV for channel 2 (prompted for interactively when omitted).
    #[arg(long = "ch2", value_name = "CSV")]
    pub ch2: Option<PathBuf>,

    /// Calibration CSV output path (prompted for interactively when omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Also export fit parameters and uncertainties to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,

    /// Known emission line wavelength in nm (repeatable; defaults to the argon set).
    #[arg(long = "line", value_name = "NM")]
    pub lines: Vec<f64>,

    /// Detector pixel pitch in meters.
    #[arg(long, default_value_t = PIXEL_PITCH_M)]
    pub pixel_pitch: f64,

    /// Spectral resolution enhancement factor.
    #[arg(long, default_value_t = RESOLUTION_ENHANCEMENT)]
    pub resolution: u32,

    /// Native sensor bins per axis.
    #[arg(long, default_value_t = SENSOR_BINS)]
    pub sensor_bins: usize,

    /// Peak acceptance floor, as a divisor of the histogram maximum.
    #[arg(long, default_value_t = PEAK_FLOOR_DIVISOR)]
    pub peak_floor: f64,

    /// Half-width of the spatial acceptance band, in fitted sigmas.
    #[arg(long, default_value_t = BAND_HALF_WIDTH_SIGMAS)]
    pub band_sigmas: f64,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for synthetic source generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Events per spectral line.
    #[arg(long, default_value_t = 20_000)]
    pub events_per_line: usize,

    /// Uniform background events over the whole sensor.
    #[arg(long, default_value_t = 2_000)]
    pub background: usize,

    /// Spatial row of the line (native pixels).
    #[arg(long, default_value_t = 128.0)]
    pub row: f64,

    /// One-sigma spatial width of the line (native pixels).
    #[arg(long, default_value_t = 3.0)]
    pub row_sigma: f64,

    /// Line center on the dispersion axis, enhanced bins (repeatable).
    #[arg(long = "center", value_name = "BIN")]
    pub centers: Vec<f64>,

    /// One-sigma width of each spectral cluster (enhanced bins).
    #[arg(long, default_value_t = 1.5)]
    pub cluster_sigma: f64,

    /// Spectral resolution enhancement factor the centers refer to.
    #[arg(long, default_value_t = RESOLUTION_ENHANCEMENT)]
    pub resolution: u32,

    /// Detector pixel pitch in meters.
    #[arg(long, default_value_t = PIXEL_PITCH_M)]
    pub pixel_pitch: f64,
}
