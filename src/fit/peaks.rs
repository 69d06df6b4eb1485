//! Peak detection on the spectral histogram.
//!
//! Local maxima are found with a plateau-aware scan: a run of equal samples
//! counts as one peak at its midpoint once both flanks fall away. Peaks below
//! `max(histogram) / floor_divisor` are discarded. No merging of close peaks
//! beyond that; spurious doubles are supposed to surface as a count mismatch
//! downstream, not to be silently repaired here.

/// Find peak bin indices in ascending order.
///
/// Endpoints can never be peaks. An all-zero histogram yields no peaks.
pub fn find_peaks(hist: &[u32], floor_divisor: f64) -> Vec<usize> {
    let Some(&max) = hist.iter().max() else {
        return Vec::new();
    };
    if max == 0 {
        return Vec::new();
    }
    let floor = f64::from(max) / floor_divisor;

    let mut peaks = Vec::new();
    let n = hist.len();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < n - 1 {
        if hist[i - 1] < hist[i] {
            // Walk across a possible plateau of equal samples.
            let mut ahead = i + 1;
            while ahead < n - 1 && hist[ahead] == hist[i] {
                ahead += 1;
            }

            if hist[ahead] < hist[i] {
                let mid = (i + ahead - 1) / 2;
                if f64::from(hist[mid]) >= floor {
                    peaks.push(mid);
                }
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Rescale enhanced-resolution peak bins to native pixel units.
pub fn peaks_to_native_px(peaks: &[usize], resolution: u32) -> Vec<f64> {
    peaks
        .iter()
        .map(|&p| p as f64 / f64::from(resolution))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// N well-separated Gaussian bumps of height `height` over a flat floor.
    fn bumpy_histogram(centers: &[usize], height: f64, floor: f64, len: usize) -> Vec<u32> {
        (0..len)
            .map(|i| {
                let mut v = floor;
                for &c in centers {
                    let u = (i as f64 - c as f64) / 2.0;
                    v += height * (-u * u).exp();
                }
                v.round() as u32
            })
            .collect()
    }

    #[test]
    fn finds_each_well_separated_bump_once() {
        let centers = [100, 140, 180, 220];
        let hist = bumpy_histogram(&centers, 300.0, 15.0, 512);

        let peaks = find_peaks(&hist, 15.0);
        assert_eq!(peaks.len(), centers.len());
        for (p, c) in peaks.iter().zip(centers.iter()) {
            assert!(p.abs_diff(*c) <= 1, "peak {p} too far from bump at {c}");
        }
    }

    #[test]
    fn bumps_below_the_floor_threshold_are_ignored() {
        // One tall bump and one at height/20 < max/15.
        let mut hist = bumpy_histogram(&[100], 300.0, 0.0, 512);
        let faint = bumpy_histogram(&[300], 15.0, 0.0, 512);
        for (a, b) in hist.iter_mut().zip(faint.iter()) {
            *a += *b;
        }

        let peaks = find_peaks(&hist, 15.0);
        assert_eq!(peaks, vec![100]);
    }

    #[test]
    fn plateau_reports_its_midpoint() {
        let hist = [0, 1, 5, 5, 5, 1, 0];
        assert_eq!(find_peaks(&hist, 15.0), vec![3]);
    }

    #[test]
    fn endpoints_and_flat_histograms_yield_no_peaks() {
        assert!(find_peaks(&[5, 1, 1, 1, 5], 15.0).is_empty());
        assert!(find_peaks(&[3, 3, 3, 3], 15.0).is_empty());
        assert!(find_peaks(&[], 15.0).is_empty());
    }

    #[test]
    fn rescaling_divides_by_the_enhancement_factor() {
        assert_eq!(peaks_to_native_px(&[100, 241], 2), vec![50.0, 120.5]);
    }
}
