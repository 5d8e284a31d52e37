//! `nav-output` — navigation trace writers.
//!
//! | Backend | Files created                                                     |
//! |---------|-------------------------------------------------------------------|
//! | CSV     | `navigation_states.csv`, `lifecycle.csv`, `rejected_fixes.csv`    |
//!
//! Backends implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `nav_session::NavigationObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nav_output::{CsvTraceWriter, TraceObserver};
//!
//! let trace = TraceObserver::new(CsvTraceWriter::new(Path::new("./trace"))?);
//! let mut session = SessionBuilder::new(gps, compass)
//!     .observer(trace.clone())
//!     .build()?;
//! session.start(destination)?;
//! session.run()?;
//! trace.finish();
//! trace.take_error().map(|e| eprintln!("trace error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{PhaseRow, RejectionRow, StateRow};
pub use writer::TraceWriter;
