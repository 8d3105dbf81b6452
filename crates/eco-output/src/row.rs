//! Plain data row written by output backends.

use eco_sim::TickRecord;

/// One tick record flattened for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub tick:          u64,
    pub year:          i32,
    /// 0 = January.
    pub month:         u8,
    pub temperature:   f64,
    pub precipitation: f64,
    /// Quantities in schema order, matching the names passed to `begin`.
    pub values:        Vec<f64>,
}

impl From<&TickRecord> for ReportRow {
    fn from(record: &TickRecord) -> Self {
        Self {
            tick:          record.tick,
            year:          record.calendar.year,
            month:         record.calendar.month,
            temperature:   record.readings.temperature,
            precipitation: record.readings.precipitation,
            values:        record.values.clone(),
        }
    }
}
