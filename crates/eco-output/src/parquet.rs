//! Parquet output backend (feature `parquet`).
//!
//! Creates `records.parquet` in the configured output directory with the
//! leading columns followed by one `Float64` column per field.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int32Builder, UInt64Builder, UInt8Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::{check_width, OutputWriter, LEADING_COLUMNS};
use crate::{OutputError, OutputResult, ReportRow};

/// Rows buffered before a record batch is written.
const BATCH_ROWS: usize = 1024;

fn record_schema(field_names: &[String]) -> Arc<Schema> {
    let mut fields = vec![
        Field::new("tick",          DataType::UInt64,  false),
        Field::new("year",          DataType::Int32,   false),
        Field::new("month",         DataType::UInt8,   false),
        Field::new("temperature",   DataType::Float64, false),
        Field::new("precipitation", DataType::Float64, false),
    ];
    fields.extend(field_names.iter().map(|n| Field::new(n, DataType::Float64, false)));
    Arc::new(Schema::new(fields))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes tick records to one Parquet file.
///
/// The file is created by `begin()`, once the column set is known.
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
/// A writer holds a single run: `begin` or `write_record` after `finish()`
/// return [`OutputError::Finished`].
pub struct ParquetWriter {
    path:     PathBuf,
    writer:   Option<ArrowWriter<File>>,
    schema:   Option<Arc<Schema>>,
    pending:  Vec<ReportRow>,
    finished: bool,
}

impl ParquetWriter {
    /// Target `records.parquet` in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory {} does not exist", dir.display()),
            )
            .into());
        }
        Ok(Self {
            path:     dir.join("records.parquet"),
            writer:   None,
            schema:   None,
            pending:  Vec::with_capacity(BATCH_ROWS),
            finished: false,
        })
    }

    fn flush_pending(&mut self) -> OutputResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let (Some(writer), Some(schema)) = (self.writer.as_mut(), self.schema.as_ref()) else {
            self.pending.clear();
            return Ok(());
        };

        let mut ticks          = UInt64Builder::new();
        let mut years          = Int32Builder::new();
        let mut months         = UInt8Builder::new();
        let mut temperatures   = Float64Builder::new();
        let mut precipitations = Float64Builder::new();
        let width = schema.fields().len() - LEADING_COLUMNS.len();
        let mut values: Vec<Float64Builder> = (0..width).map(|_| Float64Builder::new()).collect();

        for row in &self.pending {
            ticks.append_value(row.tick);
            years.append_value(row.year);
            months.append_value(row.month);
            temperatures.append_value(row.temperature);
            precipitations.append_value(row.precipitation);
            for (column, &v) in values.iter_mut().zip(&row.values) {
                column.append_value(v);
            }
        }

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(ticks.finish()),
            Arc::new(years.finish()),
            Arc::new(months.finish()),
            Arc::new(temperatures.finish()),
            Arc::new(precipitations.finish()),
        ];
        columns.extend(values.iter_mut().map(|b| Arc::new(b.finish()) as ArrayRef));

        let batch = RecordBatch::try_new(Arc::clone(schema), columns)?;
        writer.write(&batch)?;
        self.pending.clear();
        Ok(())
    }
}

impl OutputWriter for ParquetWriter {
    fn begin(&mut self, field_names: &[String]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        if let Some(schema) = self.schema.as_ref() {
            let expected = schema.fields().len() - LEADING_COLUMNS.len();
            if expected != field_names.len() {
                return Err(OutputError::ColumnMismatch { expected, got: field_names.len() });
            }
            return Ok(());
        }
        let schema = record_schema(field_names);
        let file = File::create(&self.path)?;
        self.writer = Some(ArrowWriter::try_new(file, Arc::clone(&schema), Some(snappy_props()))?);
        self.schema = Some(schema);
        Ok(())
    }

    fn write_record(&mut self, row: &ReportRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let Some(schema) = self.schema.as_ref() else {
            return Err(OutputError::NotStarted);
        };
        check_width(schema.fields().len() - LEADING_COLUMNS.len(), row)?;
        self.pending.push(row.clone());
        if self.pending.len() >= BATCH_ROWS {
            self.flush_pending()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.flush_pending()?;
        if let Some(w) = self.writer.take() {
            self.finished = true;
            w.close()?;
        }
        Ok(())
    }
}
