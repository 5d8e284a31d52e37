//! CSV trace backend.
//!
//! Creates three files in the configured directory:
//! - `navigation_states.csv`
//! - `lifecycle.csv`
//! - `rejected_fixes.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::debug;

use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult, PhaseRow, RejectionRow, StateRow};

pub const STATES_FILE:     &str = "navigation_states.csv";
pub const LIFECYCLE_FILE:  &str = "lifecycle.csv";
pub const REJECTIONS_FILE: &str = "rejected_fixes.csv";

struct Files {
    states:     Writer<File>,
    lifecycle:  Writer<File>,
    rejections: Writer<File>,
}

/// Writes a navigation trace to three CSV files.
pub struct CsvTraceWriter {
    files: Option<Files>,
}

impl CsvTraceWriter {
    /// Create (or truncate) the CSV files in `dir` and write the header rows.
    /// `dir` is created if missing.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut states = Writer::from_path(dir.join(STATES_FILE))?;
        states.write_record([
            "seq",
            "recorded_at_ms",
            "distance_m",
            "bearing_deg",
            "relative_bearing_deg",
            "turn_direction",
            "is_on_track",
            "arrived",
            "eta_label",
            "gps_accuracy_m",
            "heading_available",
        ])?;

        let mut lifecycle = Writer::from_path(dir.join(LIFECYCLE_FILE))?;
        lifecycle.write_record(["recorded_at_ms", "from", "to"])?;

        let mut rejections = Writer::from_path(dir.join(REJECTIONS_FILE))?;
        rejections.write_record(["recorded_at_ms", "lat", "lon", "accuracy_m", "reason"])?;

        debug!("writing navigation trace to {}", dir.display());
        Ok(Self {
            files: Some(Files { states, lifecycle, rejections }),
        })
    }

    fn files(&mut self) -> OutputResult<&mut Files> {
        self.files.as_mut().ok_or(OutputError::Finished)
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_state(&mut self, row: &StateRow) -> OutputResult<()> {
        self.files()?.states.write_record(&[
            row.seq.to_string(),
            row.recorded_at_ms.to_string(),
            format!("{:.2}", row.distance_m),
            format!("{:.2}", row.bearing_deg),
            format!("{:.2}", row.relative_bearing_deg),
            row.turn_direction.to_owned(),
            (row.is_on_track as u8).to_string(),
            (row.arrived as u8).to_string(),
            row.eta_label.clone(),
            format!("{:.1}", row.gps_accuracy_m),
            (row.heading_available as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_phase(&mut self, row: &PhaseRow) -> OutputResult<()> {
        self.files()?.lifecycle.write_record([
            row.recorded_at_ms.to_string().as_str(),
            row.from.as_str(),
            row.to.as_str(),
        ])?;
        Ok(())
    }

    fn write_rejection(&mut self, row: &RejectionRow) -> OutputResult<()> {
        self.files()?.rejections.write_record(&[
            row.recorded_at_ms.to_string(),
            format!("{:.7}", row.lat),
            format!("{:.7}", row.lon),
            format!("{:.1}", row.accuracy_m),
            row.reason.to_owned(),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        let files = self.files()?;
        files.states.flush()?;
        files.lifecycle.flush()?;
        files.rejections.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        let Some(mut files) = self.files.take() else {
            return Ok(());
        };
        files.states.flush()?;
        files.lifecycle.flush()?;
        files.rejections.flush()?;
        Ok(())
    }
}
