//! Calibration exports.
//!
//! - the combined calibration CSV: one row per known wavelength, one column
//!   of matched peak positions per channel
//! - an optional fit JSON with slopes/intercepts and their standard errors
//!
//! The table is rendered to a `String` first so the exact layout is testable
//! without touching the filesystem.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{CalibrationFile, ChannelCalibration};
use crate::error::AppError;

/// Render the combined calibration table.
///
/// Precondition (checked): at least one channel, and every channel carries
/// exactly one matched peak per known line. Partial tables are never written;
/// a half-calibrated instrument is worse than an uncalibrated one.
pub fn render_calibration_csv(
    known_lines: &[f64],
    channels: &[ChannelCalibration],
) -> Result<String, AppError> {
    if channels.is_empty() {
        return Err(AppError::new(3, "No calibrated channels to export."));
    }
    for ch in channels {
        if ch.peaks_px.len() != known_lines.len() {
            return Err(AppError::new(
                3,
                format!(
                    "Channel {} has {} peaks for {} known lines.",
                    ch.channel,
                    ch.peaks_px.len(),
                    known_lines.len()
                ),
            ));
        }
    }

    let mut out = String::from("Wavelength [nm]");
    for ch in channels {
        out.push_str(&format!(", Bin {} [px]", ch.channel));
    }
    out.push('\n');

    for (ix, line) in known_lines.iter().enumerate() {
        out.push_str(&format!("{line}"));
        for ch in channels {
            out.push_str(&format!(", {}", ch.peaks_px[ix]));
        }
        out.push('\n');
    }

    Ok(out)
}

/// Write the combined calibration CSV.
pub fn write_calibration_csv(
    path: &Path,
    known_lines: &[f64],
    channels: &[ChannelCalibration],
) -> Result<(), AppError> {
    let table = render_calibration_csv(known_lines, channels)?;

    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create calibration CSV '{}': {e}", path.display()),
        )
    })?;
    file.write_all(table.as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write calibration CSV: {e}")))?;

    Ok(())
}

/// Write the fit JSON export (per-channel slope/intercept and peak table).
pub fn write_fit_json(
    path: &Path,
    known_lines: &[f64],
    channels: &[ChannelCalibration],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display()))
    })?;

    let out = CalibrationFile {
        tool: "wavecal".to_string(),
        known_lines_nm: known_lines.to_vec(),
        channels: channels.to_vec(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}
