//! Peak-to-line matching and the calibration regression.
//!
//! Pairing is strictly positional: the i-th peak in ascending pixel order is
//! paired with the i-th known line. The only validation is count equality.
//! There is deliberately no smarter correspondence search; changing the
//! pairing rule changes calibration semantics. The known fidelity risk: peak
//! *ordering* is never cross-checked against line ordering, so the caller
//! must supply known lines in the order the lines appear on the sensor.

use crate::domain::CalibrationFit;
use crate::error::ChannelError;
use crate::math::ols::linear_regression;

/// Regress known wavelengths onto matched peak positions.
///
/// `PeakCountMismatch` is returned before any regression work when the counts
/// differ; the caller surfaces it with a diagnostic plot instead of guessing
/// a correspondence.
pub fn match_known_lines(
    peaks_px: &[f64],
    known_lines: &[f64],
) -> Result<CalibrationFit, ChannelError> {
    if peaks_px.len() != known_lines.len() {
        return Err(ChannelError::PeakCountMismatch {
            found: peaks_px.len(),
            expected: known_lines.len(),
        });
    }

    // Peaks arrive as distinct ascending bin positions, so the regression is
    // only degenerate when the known-line set itself is (fewer than two
    // lines).
    let fit = linear_regression(peaks_px, known_lines).ok_or_else(|| {
        ChannelError::FitDivergence("degenerate calibration regression".to_string())
    })?;

    Ok(CalibrationFit {
        slope: fit.slope,
        intercept: fit.intercept,
        slope_stderr: fit.slope_stderr,
        intercept_stderr: fit.intercept_stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_linear_peaks_reproduce_every_wavelength() {
        let peaks = [50.0, 60.0, 75.5, 90.0, 121.0];
        let lines: Vec<f64> = peaks.iter().map(|&p| 0.34 * p + 760.0).collect();

        let fit = match_known_lines(&peaks, &lines).unwrap();
        for (&p, &l) in peaks.iter().zip(lines.iter()) {
            assert!((fit.wavelength_at(p) - l).abs() < 1e-9);
        }
        assert!(fit.slope_stderr.abs() < 1e-9);
    }

    #[test]
    fn count_mismatch_yields_no_fit() {
        let err = match_known_lines(&[1.0, 2.0], &[794.8, 800.6, 801.5]).unwrap_err();
        match err {
            ChannelError::PeakCountMismatch { found, expected } => {
                assert_eq!(found, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("expected count mismatch, got {other:?}"),
        }
    }

    #[test]
    fn single_line_set_is_degenerate() {
        assert!(matches!(
            match_known_lines(&[1.0], &[794.8]),
            Err(ChannelError::FitDivergence(_))
        ));
    }
}
