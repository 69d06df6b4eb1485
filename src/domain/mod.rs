//! Shared domain types and instrument constants.

pub mod types;

pub use types::*;

/// Argon emission lines (nm) used as the default calibration reference.
///
/// Ordered ascending. Pairing with detected peaks is strictly positional, so
/// this order must match the spatial order of the lines on the sensor.
pub const ARGON_LINES_NM: [f64; 8] = [
    794.8176, 800.6157, 801.4786, 810.3693, 811.5311, 826.4522, 840.821, 842.4648,
];

/// Physical pixel pitch of the sensor (meters).
pub const PIXEL_PITCH_M: f64 = 55e-6;

/// Native pixel span of the sensor along each axis.
pub const SENSOR_BINS: usize = 256;

/// Default sub-pixel resolution enhancement on the dispersion axis.
pub const RESOLUTION_ENHANCEMENT: u32 = 2;

/// Peaks shorter than `max(histogram) / PEAK_FLOOR_DIVISOR` are ignored.
pub const PEAK_FLOOR_DIVISOR: f64 = 15.0;

/// Acceptance band half-width, in units of the fitted sigma.
pub const BAND_HALF_WIDTH_SIGMAS: f64 = 2.0;
