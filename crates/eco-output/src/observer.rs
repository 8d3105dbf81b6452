//! `ReportOutputSink<W>` — bridges `ReportSink` to an `OutputWriter`.

use eco_core::StateSchema;
use eco_sim::{ReportSink, RunSummary, TickRecord};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, ReportRow};

/// A [`ReportSink`] that writes every tick record to any [`OutputWriter`]
/// backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `ReportSink` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct ReportOutputSink<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ReportOutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("output writer failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ReportSink for ReportOutputSink<W> {
    fn on_start(&mut self, schema: &StateSchema) {
        let result = self.writer.begin(&schema.names());
        self.store_err(result);
    }

    fn on_record(&mut self, record: &TickRecord) {
        let result = self.writer.write_record(&ReportRow::from(record));
        self.store_err(result);
    }

    fn on_finish(&mut self, _summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
