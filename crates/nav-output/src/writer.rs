//! The `TraceWriter` trait implemented by all backend writers.

use crate::{OutputResult, PhaseRow, RejectionRow, StateRow};

/// Trait implemented by trace backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored and retrieved with [`TraceObserver::take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    fn write_state(&mut self, row: &StateRow) -> OutputResult<()>;

    fn write_phase(&mut self, row: &PhaseRow) -> OutputResult<()>;

    fn write_rejection(&mut self, row: &RejectionRow) -> OutputResult<()>;

    /// Push buffered rows to disk without closing.
    fn flush(&mut self) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; rows written after `finish` are an error.
    fn finish(&mut self) -> OutputResult<()>;
}
