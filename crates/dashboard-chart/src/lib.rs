//! Chart-data preparation for the study dashboard.
//!
//! Converts the aggregator's derived sequences into the minimal labelled
//! and (x, y) series a bar chart and a line chart consume. Everything here
//! is a pure transformation; rendering belongs to the presentation layer.

pub mod bar;
pub mod line;

pub use bar::{to_bar_series, BarBucketing, BarPoint};
pub use line::{to_line_series, LineAxis, LinePoint};
