//! Report sink trait and the records it receives.

use eco_core::{Calendar, FieldId, Readings, StateSchema, StateView};

// ── TickRecord ────────────────────────────────────────────────────────────────

/// The fully committed state at the end of one tick.
///
/// Tick 0 is the initial state, reported before any worker starts.  Tick `k`
/// is captured by the observer after tick `k`'s commit barrier and after the
/// calendar and readings have moved on to the next month.
#[derive(Clone, Debug, PartialEq)]
pub struct TickRecord {
    pub tick:     u64,
    pub calendar: Calendar,
    pub readings: Readings,
    /// Quantities in schema order.
    pub values:   Vec<f64>,
}

impl TickRecord {
    /// Capture everything `view` can see.
    pub fn capture(tick: u64, view: StateView<'_>) -> Self {
        Self {
            tick,
            calendar: view.calendar(),
            readings: view.readings(),
            values:   view.snapshot(),
        }
    }

    /// # Panics
    /// Panics if `field` was not part of the schema the record came from.
    #[inline]
    pub fn value(&self, field: FieldId) -> f64 {
        self.values[field.index()]
    }
}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Returned by [`Sim::run`][crate::Sim::run] and passed to
/// [`ReportSink::on_finish`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed by this run.
    pub ticks:          u64,
    pub final_calendar: Calendar,
    /// Barrier rounds completed over the barrier's lifetime.
    pub barrier_rounds: u64,
}

// ── ReportSink ────────────────────────────────────────────────────────────────

/// Receives one record per tick from the observer worker.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  `on_record` runs on the observer thread
/// inside the Observe phase; a slow sink delays the next tick for everyone.
///
/// # Example — line printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl ReportSink for Printer {
///     fn on_record(&mut self, r: &TickRecord) {
///         println!("{} {:?}", r.calendar, r.values);
///     }
/// }
/// ```
pub trait ReportSink {
    /// Called once before the initial record.
    fn on_start(&mut self, _schema: &StateSchema) {}

    /// Called for the initial state and then once per tick.
    fn on_record(&mut self, _record: &TickRecord) {}

    /// Called once after every worker has terminated.
    fn on_finish(&mut self, _summary: &RunSummary) {}
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn on_start(&mut self, schema: &StateSchema) {
        (**self).on_start(schema)
    }

    fn on_record(&mut self, record: &TickRecord) {
        (**self).on_record(record)
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        (**self).on_finish(summary)
    }
}

/// A [`ReportSink`] that does nothing.
pub struct NoopSink;

impl ReportSink for NoopSink {}

/// A [`ReportSink`] that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    pub field_names: Vec<String>,
    pub records:     Vec<TickRecord>,
    pub summary:     Option<RunSummary>,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The values of one field across all records.
    pub fn series(&self, field: FieldId) -> Vec<f64> {
        self.records.iter().map(|r| r.value(field)).collect()
    }
}

impl ReportSink for RecordBuffer {
    fn on_start(&mut self, schema: &StateSchema) {
        self.field_names = schema.names();
    }

    fn on_record(&mut self, record: &TickRecord) {
        self.records.push(record.clone());
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        self.summary = Some(*summary);
    }
}
