//! Centroid CSV ingest.
//!
//! The calibration source is a line-oriented `x,y` export in physical meters
//! with one header line. Records are parsed strictly: anything that does not
//! split into exactly two numeric fields aborts the channel with a parse
//! error (skipping bad centroids silently would bias the histograms).
//!
//! The pipeline reads each source twice (spatial pass, then spectral pass),
//! so a source is something that can be *re-opened*, not a one-shot reader.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::domain::DetectorEvent;
use crate::error::ChannelError;

/// A re-openable stream of centroid records.
pub trait EventSource {
    /// Open a fresh reader positioned at the start of the data (header line
    /// included).
    fn open(&self) -> Result<Box<dyn Read>, ChannelError>;

    /// Human-readable label for logs and reports.
    fn label(&self) -> String;
}

/// Centroid CSV on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for FileSource {
    fn open(&self) -> Result<Box<dyn Read>, ChannelError> {
        let file = File::open(&self.path)
            .map_err(|e| ChannelError::Io(format!("failed to open '{}': {e}", self.path.display())))?;
        Ok(Box::new(file))
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory source, for tests and synthetic dry runs.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl EventSource for MemorySource {
    fn open(&self) -> Result<Box<dyn Read>, ChannelError> {
        Ok(Box::new(Cursor::new(self.data.clone().into_bytes())))
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Scan every record of `reader`, applying the fixed 90° sensor-rotation
/// axis swap, and feed each event to `f`. Returns the number of events seen.
///
/// The first line is treated as a header and discarded.
pub fn scan_events<R: Read>(
    reader: R,
    mut f: impl FnMut(DetectorEvent),
) -> Result<u64, ChannelError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut seen = 0u64;
    for (idx, result) in csv_reader.records().enumerate() {
        // +2: records start after the discarded header, and CSV line numbers
        // are 1-based.
        let line = idx + 2;

        let record = result.map_err(|e| ChannelError::Parse {
            line,
            message: e.to_string(),
        })?;
        if record.len() != 2 {
            return Err(ChannelError::Parse {
                line,
                message: format!("expected 2 fields, got {}", record.len()),
            });
        }

        let x = parse_field(&record, 0, line)?;
        let y = parse_field(&record, 1, line)?;

        // The sensor is mounted rotated by 90 degrees: the file's first
        // column is the dispersion coordinate, the second the spatial row.
        f(DetectorEvent { x: y, y: x });
        seen += 1;
    }

    Ok(seen)
}

fn parse_field(record: &csv::StringRecord, idx: usize, line: usize) -> Result<f64, ChannelError> {
    let raw = record.get(idx).unwrap_or("");
    let value = raw.parse::<f64>().map_err(|_| ChannelError::Parse {
        line,
        message: format!("invalid number '{raw}'"),
    })?;
    if !value.is_finite() {
        return Err(ChannelError::Parse {
            line,
            message: format!("non-finite value '{raw}'"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &str) -> Result<Vec<DetectorEvent>, ChannelError> {
        let mut events = Vec::new();
        scan_events(Cursor::new(data.as_bytes().to_vec()), |ev| events.push(ev))?;
        Ok(events)
    }

    #[test]
    fn header_is_discarded_and_axes_are_swapped() {
        let events = collect("x [m],y [m]\n0.00055,0.00011\n").unwrap();

        assert_eq!(events.len(), 1);
        assert!((events[0].x - 0.00011).abs() < 1e-12);
        assert!((events[0].y - 0.00055).abs() < 1e-12);
    }

    #[test]
    fn wrong_field_count_is_a_parse_error_with_line_number() {
        let err = collect("x,y\n0.001,0.002\n0.001,0.002,0.003\n").unwrap_err();

        match err {
            ChannelError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_field_is_a_parse_error() {
        let err = collect("x,y\nfoo,0.002\n").unwrap_err();
        assert!(matches!(err, ChannelError::Parse { line: 2, .. }));
    }

    #[test]
    fn memory_source_reopens_from_the_start() {
        let source = MemorySource::new("mem", "x,y\n0.001,0.002\n");

        for _ in 0..2 {
            let mut n = 0u32;
            scan_events(source.open().unwrap(), |_| n += 1).unwrap();
            assert_eq!(n, 1);
        }
    }
}
