//! Domain types for the calibration pipeline.
//!
//! These are intentionally lightweight: everything is per-invocation, computed
//! once, and only the two histograms are ever built incrementally.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{
    ARGON_LINES_NM, BAND_HALF_WIDTH_SIGMAS, PEAK_FLOOR_DIVISOR, PIXEL_PITCH_M,
    RESOLUTION_ENHANCEMENT, SENSOR_BINS,
};

/// A single detected photon hit in physical coordinates (meters), after the
/// fixed 90° sensor-rotation axis swap.
///
/// `x` is the cross-dispersion (spatial) coordinate, `y` the dispersion
/// coordinate. Events are consumed into histogram bins as they are scanned
/// and never retained as a collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorEvent {
    pub x: f64,
    pub y: f64,
}

/// Resolved configuration for one calibration run.
#[derive(Debug, Clone)]
pub struct CalConfig {
    /// Physical pixel pitch (meters).
    pub pixel_pitch: f64,
    /// Native pixel span of the sensor along each axis.
    pub sensor_bins: usize,
    /// Sub-pixel resolution enhancement factor on the dispersion axis.
    pub resolution: u32,
    /// Peaks below `max(histogram) / peak_floor_divisor` are ignored.
    pub peak_floor_divisor: f64,
    /// Acceptance band half-width in fitted sigmas.
    pub band_half_width: f64,
    /// Reference wavelengths (nm), ascending by spatial line order.
    pub known_lines: Vec<f64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub output: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
}

impl CalConfig {
    /// Defaults for the actual instrument (Ar lamp, 256-pixel sensor, 2x
    /// sub-pixel binning).
    pub fn instrument_defaults() -> Self {
        Self {
            pixel_pitch: PIXEL_PITCH_M,
            sensor_bins: SENSOR_BINS,
            resolution: RESOLUTION_ENHANCEMENT,
            peak_floor_divisor: PEAK_FLOOR_DIVISOR,
            band_half_width: BAND_HALF_WIDTH_SIGMAS,
            known_lines: ARGON_LINES_NM.to_vec(),
            plot: false,
            plot_width: 100,
            plot_height: 25,
            output: None,
            export_fit: None,
        }
    }

    /// Length of the enhanced-resolution spectral histogram.
    pub fn spectrum_bins(&self) -> usize {
        self.sensor_bins * self.resolution as usize
    }
}

/// Gaussian-plus-offset fit of the marginal spatial intensity profile.
///
/// Invariant: `sigma > 0` (the fitter reports the positive root).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpatialProfile {
    pub center: f64,
    pub amplitude: f64,
    pub sigma: f64,
    pub baseline: f64,
}

impl SpatialProfile {
    /// Inclusive acceptance band `[center - k·sigma, center + k·sigma]` in
    /// native row units.
    pub fn acceptance_band(&self, half_width_sigmas: f64) -> (f64, f64) {
        let w = half_width_sigmas * self.sigma;
        (self.center - w, self.center + w)
    }
}

/// Linear pixel-to-wavelength calibration with regression standard errors.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalibrationFit {
    pub slope: f64,
    pub intercept: f64,
    pub slope_stderr: f64,
    pub intercept_stderr: f64,
}

impl CalibrationFit {
    /// Wavelength predicted for a native-pixel position.
    pub fn wavelength_at(&self, pixel: f64) -> f64 {
        self.slope * pixel + self.intercept
    }
}

/// Successful calibration of one channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelCalibration {
    pub channel: u32,
    /// Matched peak positions (native pixels), aligned index-by-index with
    /// the known lines.
    pub peaks_px: Vec<f64>,
    pub profile: SpatialProfile,
    pub fit: CalibrationFit,
}

/// Terminal state of one channel's pipeline.
///
/// `Skipped` covers both "no input provided" and channel-local failures that
/// were already reported; either way the channel contributes nothing to the
/// combined export.
#[derive(Debug, Clone)]
pub enum ChannelOutcome {
    /// All peaks matched; feeds the combined export.
    Calibrated(ChannelCalibration),
    /// Peak count differed from the known-line count; diagnostics only.
    Mismatched {
        /// Enhanced-resolution spectral histogram, for the diagnostic plot.
        spectrum: Vec<u32>,
        /// Detected peaks in native pixels.
        peaks_px: Vec<f64>,
        /// Number of known lines that were expected.
        expected: usize,
    },
    /// No calibration was produced for this channel.
    Skipped,
}

/// Schema of the optional fit JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationFile {
    pub tool: String,
    pub known_lines_nm: Vec<f64>,
    pub channels: Vec<ChannelCalibration>,
}
