//! `eco-output` — persisted tick records for the rust_eco simulation.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created       |
//! |-----------|-------------|---------------------|
//! | *(none)*  | CSV         | `records.csv`       |
//! | `sqlite`  | SQLite      | `output.db`         |
//! | `parquet` | Parquet     | `records.parquet`   |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`ReportOutputSink`], which implements `eco_sim::ReportSink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use eco_output::{CsvWriter, ReportOutputSink};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut sink = ReportOutputSink::new(writer);
//! sim.run(&mut sink)?;
//! if let Some(e) = sink.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReportOutputSink;
pub use row::ReportRow;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
