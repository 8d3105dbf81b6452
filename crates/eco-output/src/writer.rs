//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, ReportRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// All methods are infallible from the sink's perspective: errors are
/// stored internally and retrieved with
/// [`ReportOutputSink::take_error`][crate::ReportOutputSink::take_error].
pub trait OutputWriter {
    /// Prepare for records whose quantities are named `field_names`.
    /// Called once per run, before the first record.
    fn begin(&mut self, field_names: &[String]) -> OutputResult<()>;

    /// Write one row.
    fn write_record(&mut self, row: &ReportRow) -> OutputResult<()>;

    /// Flush buffered rows and write any file footer.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Fixed columns that precede the quantities in every backend.
pub(crate) const LEADING_COLUMNS: [&str; 5] =
    ["tick", "year", "month", "temperature", "precipitation"];

/// Errors unless `row` carries one value per named field.
pub(crate) fn check_width(expected: usize, row: &ReportRow) -> OutputResult<()> {
    if row.values.len() != expected {
        return Err(crate::OutputError::ColumnMismatch { expected, got: row.values.len() });
    }
    Ok(())
}
