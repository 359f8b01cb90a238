//! Bar-series preparation for the ECTS progress chart.

use std::collections::BTreeMap;

use dashboard_core::models::ProgressPoint;
use serde::{Deserialize, Serialize};

/// How cumulative-credit points are grouped into bar categories.
///
/// The policy is a caller configuration; the shell defaults to
/// [`BarBucketing::PerModule`], matching the per-module table of the
/// original dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarBucketing {
    /// One bar per completed module, labelled with the module id.
    #[default]
    PerModule,
    /// One bar per calendar month (`YYYY-MM`), holding the cumulative
    /// credit value at the end of that month.
    Monthly,
}

/// One labelled bar: a category plus its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    /// Category label (module id or month key).
    pub label: String,
    /// Cumulative credits at this category.
    pub value: f64,
}

/// Convert the cumulative-credits series into labelled bar categories.
///
/// Input points are expected in the aggregator's output order (ascending
/// by date); the result is deterministic given that ordering. Pure
/// transformation, no I/O.
pub fn to_bar_series(points: &[ProgressPoint], bucketing: BarBucketing) -> Vec<BarPoint> {
    match bucketing {
        BarBucketing::PerModule => points
            .iter()
            .map(|p| BarPoint {
                label: p.module_id.clone(),
                value: p.cumulative_credits,
            })
            .collect(),
        BarBucketing::Monthly => {
            // Later points overwrite earlier ones within a month, leaving
            // the cumulative value at the end of that month.
            let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
            for point in points {
                buckets.insert(
                    point.date.format("%Y-%m").to_string(),
                    point.cumulative_credits,
                );
            }
            buckets
                .into_iter()
                .map(|(label, value)| BarPoint { label, value })
                .collect()
        }
    }
}
