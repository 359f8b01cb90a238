//! Line-series preparation for the grade trend chart.

use chrono::Datelike;
use dashboard_core::models::GradePoint;
use serde::{Deserialize, Serialize};

/// What the x coordinate of a line point represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAxis {
    /// x = days since the Common Era epoch; undated points are skipped.
    #[default]
    Date,
    /// x = sequential attempt index (0, 1, 2, …); all points are kept.
    Index,
}

/// One (x, y) coordinate pair, directly consumable by a charting widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: f64,
    pub y: f64,
}

/// Convert the grade trend into plain (x, y) pairs.
///
/// Input points are expected in the aggregator's output order. Pure
/// transformation, no I/O.
pub fn to_line_series(points: &[GradePoint], axis: LineAxis) -> Vec<LinePoint> {
    match axis {
        LineAxis::Date => points
            .iter()
            .filter_map(|p| {
                p.date.map(|date| LinePoint {
                    x: f64::from(date.num_days_from_ce()),
                    y: p.grade,
                })
            })
            .collect(),
        LineAxis::Index => points
            .iter()
            .enumerate()
            .map(|(i, p)| LinePoint {
                x: i as f64,
                y: p.grade,
            })
            .collect(),
    }
}
