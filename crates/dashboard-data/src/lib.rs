//! Data layer for the study dashboard.
//!
//! Responsible for loading the study-records CSV into an immutable
//! [`store::RecordStore`], deriving progress and grade aggregates, and
//! running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod store;

pub use dashboard_core as core;
