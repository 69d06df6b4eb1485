//! Full-resolution 2D occupancy histogram.

use crate::domain::DetectorEvent;

/// Fixed-size 2D occupancy grid at native pixel resolution.
///
/// Row index is the cross-dispersion (spatial) axis, column index the
/// dispersion axis. Built incrementally by the first pass and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Occupancy2D {
    bins: usize,
    counts: Vec<u32>,
    recorded: u64,
    out_of_range: u64,
}

impl Occupancy2D {
    pub fn new(bins: usize) -> Self {
        Self {
            bins,
            counts: vec![0; bins * bins],
            recorded: 0,
            out_of_range: 0,
        }
    }

    /// Accumulate one event at native resolution on both axes.
    ///
    /// Events that bin outside the sensor span are counted but not stored;
    /// a calibration source with a handful of stray centroids should not
    /// abort the channel.
    pub fn record(&mut self, event: DetectorEvent, pixel_pitch: f64) {
        let row = event.x / pixel_pitch;
        let col = event.y / pixel_pitch;
        if row < 0.0 || col < 0.0 {
            self.out_of_range += 1;
            return;
        }

        let (row, col) = (row as usize, col as usize);
        if row >= self.bins || col >= self.bins {
            self.out_of_range += 1;
            return;
        }

        self.counts[row * self.bins + col] += 1;
        self.recorded += 1;
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Events stored in the grid.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Events discarded because they fell outside the sensor span.
    pub fn out_of_range(&self) -> u64 {
        self.out_of_range
    }

    /// Marginal row profile: collapse the dispersion axis by summation.
    pub fn row_marginal(&self) -> Vec<f64> {
        (0..self.bins)
            .map(|r| {
                self.counts[r * self.bins..(r + 1) * self.bins]
                    .iter()
                    .map(|&c| f64::from(c))
                    .sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PITCH: f64 = 55e-6;

    fn event_at(row: f64, col: f64) -> DetectorEvent {
        DetectorEvent {
            x: row * PITCH,
            y: col * PITCH,
        }
    }

    #[test]
    fn records_events_into_native_bins() {
        let mut occ = Occupancy2D::new(256);
        occ.record(event_at(12.5, 30.5), PITCH);
        occ.record(event_at(12.2, 31.8), PITCH);

        assert_eq!(occ.recorded(), 2);
        assert_eq!(occ.out_of_range(), 0);

        let marginal = occ.row_marginal();
        assert!((marginal[12] - 2.0).abs() < 1e-12);
        assert!(marginal[13].abs() < 1e-12);
    }

    #[test]
    fn out_of_range_events_are_counted_not_stored() {
        let mut occ = Occupancy2D::new(256);
        occ.record(event_at(300.5, 10.5), PITCH);
        occ.record(event_at(-1.5, 10.5), PITCH);

        assert_eq!(occ.recorded(), 0);
        assert_eq!(occ.out_of_range(), 2);
    }

    #[test]
    fn marginal_sums_along_dispersion_axis() {
        let mut occ = Occupancy2D::new(8);
        for col in 0..8 {
            occ.record(event_at(3.5, col as f64 + 0.5), PITCH);
        }

        let marginal = occ.row_marginal();
        assert!((marginal[3] - 8.0).abs() < 1e-12);
        assert!((marginal.iter().sum::<f64>() - 8.0).abs() < 1e-12);
    }
}
