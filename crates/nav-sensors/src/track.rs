//! CSV track loader.
//!
//! # CSV format
//!
//! One row per recorded fix, in capture order:
//!
//! ```csv
//! lat,lon,accuracy_m,captured_at_ms
//! 12.92300,77.50100,6.0,1700000000000
//! 12.92305,77.50092,5.5,1700000001000
//! ```
//!
//! Rows are not filtered here; poor fixes reach the accuracy filter exactly as
//! a live GPS would deliver them.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nav_core::{GeoPoint, Millis, PositionFix};

use crate::{SensorError, SensorResult};

#[derive(Deserialize)]
struct TrackRecord {
    lat:            f64,
    lon:            f64,
    accuracy_m:     f64,
    captured_at_ms: u64,
}

/// Load a recorded track from a CSV file.
pub fn load_track_csv(path: &Path) -> SensorResult<Vec<PositionFix>> {
    let file = std::fs::File::open(path)?;
    load_track_reader(file)
}

/// Like [`load_track_csv`] but accepts any `Read` source.
pub fn load_track_reader<R: Read>(reader: R) -> SensorResult<Vec<PositionFix>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<TrackRecord>()
        .map(|row| {
            let row = row.map_err(|e| SensorError::Track(e.to_string()))?;
            Ok(PositionFix::new(
                GeoPoint::new(row.lat, row.lon),
                row.accuracy_m,
                Millis(row.captured_at_ms),
            ))
        })
        .collect()
}
