//! CSV output backend.
//!
//! Creates `records.csv` in the configured output directory with the header
//! `tick,year,month,temperature,precipitation,<field names…>`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::{check_width, OutputWriter, LEADING_COLUMNS};
use crate::{OutputError, OutputResult, ReportRow};

/// Writes tick records to one CSV file.
pub struct CsvWriter {
    records:  Writer<File>,
    /// Quantity columns named by the header; `None` until `begin`.
    width:    Option<usize>,
}

impl CsvWriter {
    /// Open (or create) `records.csv` in `dir`.  The header row is written by
    /// [`begin`][OutputWriter::begin] once the field names are known.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let records = Writer::from_path(dir.join("records.csv"))?;
        Ok(Self { records, width: None })
    }
}

impl OutputWriter for CsvWriter {
    fn begin(&mut self, field_names: &[String]) -> OutputResult<()> {
        // A second run on the same sim appends rows under the first header.
        if let Some(width) = self.width {
            if width != field_names.len() {
                return Err(OutputError::ColumnMismatch {
                    expected: width,
                    got:      field_names.len(),
                });
            }
            return Ok(());
        }
        let header = LEADING_COLUMNS
            .iter()
            .copied()
            .chain(field_names.iter().map(String::as_str));
        self.records.write_record(header)?;
        self.width = Some(field_names.len());
        Ok(())
    }

    fn write_record(&mut self, row: &ReportRow) -> OutputResult<()> {
        let width = self.width.ok_or(OutputError::NotStarted)?;
        check_width(width, row)?;
        let mut fields = vec![
            row.tick.to_string(),
            row.year.to_string(),
            row.month.to_string(),
            row.temperature.to_string(),
            row.precipitation.to_string(),
        ];
        fields.extend(row.values.iter().map(f64::to_string));
        self.records.write_record(&fields)?;
        Ok(())
    }

    /// Flushes buffered rows.  The file stays open so a later run on the same
    /// sim can keep appending.
    fn finish(&mut self) -> OutputResult<()> {
        self.records.flush()?;
        Ok(())
    }
}
