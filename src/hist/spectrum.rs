//! Band-filtered spectral histogram.

use crate::domain::DetectorEvent;

/// 1D spectral histogram at enhanced resolution.
///
/// Second-pass accumulator: the spatial coordinate is binned at native
/// resolution for the acceptance test, the dispersion coordinate at
/// `resolution`-times native pitch for the histogram itself. Pure filtered
/// accumulation, no fitting.
#[derive(Debug, Clone)]
pub struct Spectrum1D {
    counts: Vec<u32>,
    resolution: u32,
    /// Inclusive spatial acceptance interval in native row units.
    band: (f64, f64),
    accepted: u64,
    rejected: u64,
}

impl Spectrum1D {
    /// `bins` is the enhanced-resolution length (sensor span · resolution).
    pub fn new(bins: usize, resolution: u32, band: (f64, f64)) -> Self {
        Self {
            counts: vec![0; bins],
            resolution,
            band,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Accumulate one event, or reject it if its native spatial bin falls
    /// outside the acceptance band (band edges are inclusive).
    pub fn record(&mut self, event: DetectorEvent, pixel_pitch: f64) {
        let row = event.x / pixel_pitch;
        if row < 0.0 {
            self.rejected += 1;
            return;
        }

        // The band test runs on the truncated native bin, same binning as the
        // occupancy pass.
        let row_bin = row.trunc();
        if row_bin < self.band.0 || row_bin > self.band.1 {
            self.rejected += 1;
            return;
        }

        let col = event.y / pixel_pitch * f64::from(self.resolution);
        if col < 0.0 {
            self.rejected += 1;
            return;
        }
        let col_bin = col as usize;
        if col_bin >= self.counts.len() {
            self.rejected += 1;
            return;
        }

        self.counts[col_bin] += 1;
        self.accepted += 1;
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn into_counts(self) -> Vec<u32> {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PITCH: f64 = 55e-6;

    fn event_at(row: f64, disp: f64) -> DetectorEvent {
        DetectorEvent {
            x: row * PITCH,
            y: disp * PITCH,
        }
    }

    #[test]
    fn band_edges_are_inclusive_on_native_bins() {
        let mut spectrum = Spectrum1D::new(512, 2, (96.0, 104.0));

        // Native row 104 truncates inside the band, row 105 just outside.
        spectrum.record(event_at(104.9, 10.25), PITCH);
        spectrum.record(event_at(105.1, 10.25), PITCH);

        assert_eq!(spectrum.accepted(), 1);
        assert_eq!(spectrum.rejected(), 1);
        assert_eq!(spectrum.counts()[20], 1);
    }

    #[test]
    fn lower_band_edge_is_inclusive_too() {
        let mut spectrum = Spectrum1D::new(512, 2, (96.0, 104.0));

        spectrum.record(event_at(96.1, 40.25), PITCH);
        spectrum.record(event_at(95.9, 40.25), PITCH);

        assert_eq!(spectrum.accepted(), 1);
        assert_eq!(spectrum.rejected(), 1);
    }

    #[test]
    fn dispersion_axis_uses_enhanced_bins() {
        let mut spectrum = Spectrum1D::new(512, 2, (0.0, 255.0));

        // Native pixel 100.25 lands in enhanced bin 200.
        spectrum.record(event_at(50.5, 100.25), PITCH);
        assert_eq!(spectrum.counts()[200], 1);

        // Half a native pixel later, enhanced bin 201.
        spectrum.record(event_at(50.5, 100.75), PITCH);
        assert_eq!(spectrum.counts()[201], 1);
    }

    #[test]
    fn overflowing_dispersion_bins_are_rejected() {
        let mut spectrum = Spectrum1D::new(512, 2, (0.0, 255.0));

        spectrum.record(event_at(50.5, 256.5), PITCH);
        assert_eq!(spectrum.accepted(), 0);
        assert_eq!(spectrum.rejected(), 1);
    }
}
