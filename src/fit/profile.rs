//! Spatial profile location.
//!
//! Collapses the 2D occupancy histogram along the dispersion axis and fits a
//! Gaussian-plus-offset to the resulting row profile. The fitted center and
//! width define the acceptance band used by the spectral pass.

use log::debug;

use crate::domain::SpatialProfile;
use crate::error::ChannelError;
use crate::hist::Occupancy2D;
use crate::math::gaussian::{GaussianParams, fit_gaussian_offset};

/// Fit the marginal row profile of `occupancy`.
///
/// Initial guesses follow the instrument convention: argmax row for the
/// center, maximum count for the amplitude, one pixel for the width, median
/// count for the baseline. Non-convergence is propagated as `FitDivergence`;
/// no defaults are substituted.
pub fn fit_spatial_profile(occupancy: &Occupancy2D) -> Result<SpatialProfile, ChannelError> {
    let marginal = occupancy.row_marginal();

    let guess = initial_guess(&marginal);
    debug!(
        "spatial profile guess: x0={:.1} ymax={:.1} c={:.1}",
        guess.x0, guess.ymax, guess.c
    );

    let params = fit_gaussian_offset(&marginal, guess).ok_or_else(|| {
        ChannelError::FitDivergence("Levenberg-Marquardt iteration budget exhausted".to_string())
    })?;

    // The model is symmetric in the sign of sigma; report the positive root.
    let sigma = params.sigma.abs();
    if !(sigma > 0.0 && params.x0.is_finite()) {
        return Err(ChannelError::FitDivergence(
            "fit produced a degenerate width".to_string(),
        ));
    }

    Ok(SpatialProfile {
        center: params.x0,
        amplitude: params.ymax,
        sigma,
        baseline: params.c,
    })
}

fn initial_guess(marginal: &[f64]) -> GaussianParams {
    let mut x0 = 0.0;
    let mut ymax = f64::NEG_INFINITY;
    for (i, &v) in marginal.iter().enumerate() {
        if v > ymax {
            ymax = v;
            x0 = i as f64;
        }
    }

    GaussianParams {
        x0,
        ymax,
        sigma: 1.0,
        c: median(marginal),
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DetectorEvent;

    const PITCH: f64 = 55e-6;

    /// Deterministic occupancy: per-row counts follow a Gaussian bump over a
    /// flat floor, events spread across dispersion columns.
    fn synthetic_occupancy(center: f64, sigma: f64, amplitude: f64, floor: f64) -> Occupancy2D {
        let mut occ = Occupancy2D::new(256);
        for row in 0..256 {
            let u = (row as f64 - center) / sigma;
            let count = (amplitude * (-u * u).exp() + floor).round() as usize;
            for k in 0..count {
                occ.record(
                    DetectorEvent {
                        x: (row as f64 + 0.5) * PITCH,
                        y: ((k % 256) as f64 + 0.5) * PITCH,
                    },
                    PITCH,
                );
            }
        }
        occ
    }

    #[test]
    fn recovers_center_and_width_of_the_line() {
        let occ = synthetic_occupancy(90.0, 5.0, 400.0, 10.0);

        let profile = fit_spatial_profile(&occ).unwrap();
        assert!((profile.center - 90.0).abs() < 0.1);
        assert!((profile.sigma - 5.0).abs() < 0.1);
        assert!(profile.sigma > 0.0);
    }

    #[test]
    fn acceptance_band_spans_two_sigma_each_side() {
        let occ = synthetic_occupancy(128.0, 3.0, 500.0, 8.0);

        let profile = fit_spatial_profile(&occ).unwrap();
        let (lo, hi) = profile.acceptance_band(2.0);
        assert!((lo - (profile.center - 2.0 * profile.sigma)).abs() < 1e-12);
        assert!((hi - (profile.center + 2.0 * profile.sigma)).abs() < 1e-12);
    }

    #[test]
    fn median_of_even_and_odd_lengths() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-12);
        assert!((median(&[4.0, 1.0, 2.0, 3.0]) - 2.5).abs() < 1e-12);
    }
}
