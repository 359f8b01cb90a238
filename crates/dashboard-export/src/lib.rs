//! Export layer for the study dashboard.
//!
//! Flattens a record snapshot plus its derived cumulative credits into a
//! fixed-column table and writes it as a spreadsheet-compatible CSV file.

pub mod table;
pub mod writer;

pub use table::{to_export_table, ExportRow};
pub use writer::{export_records, write_csv};
