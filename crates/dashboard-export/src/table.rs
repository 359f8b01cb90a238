//! Conversion of a record snapshot into the fixed-column export table.

use chrono::NaiveDate;
use dashboard_core::models::{RecordStatus, StudyRecord};
use serde::{Deserialize, Serialize};

/// One row of the export table.
///
/// The column set is fixed: the original record fields plus the derived
/// cumulative-credits value. Field order here is the column order in the
/// written file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub module_id: String,
    pub module_name: String,
    pub credits: f64,
    pub grade: Option<f64>,
    pub status: RecordStatus,
    pub date: Option<NaiveDate>,
    /// Running earned-credit total as of this row's date; empty for rows
    /// that do not appear in the cumulative time series.
    pub cumulative_credits: Option<f64>,
}

impl ExportRow {
    /// Column names in file order, mirroring the field order above.
    pub const COLUMNS: [&'static str; 7] = [
        "module_id",
        "module_name",
        "credits",
        "grade",
        "status",
        "date",
        "cumulative_credits",
    ];
}

/// Build the export table from a record snapshot.
///
/// Rows keep the store's load order. The cumulative column follows the
/// aggregator's ordering rules (passed and dated, ascending by date with
/// module-id tie breaking), so exporting then re-aggregating is stable.
/// The snapshot itself is never mutated.
pub fn to_export_table(records: &[StudyRecord]) -> Vec<ExportRow> {
    // Assign running sums to the original indices of dated passed records.
    let mut order: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_passed() && r.date.is_some())
        .map(|(i, _)| i)
        .collect();
    order.sort_by(|&a, &b| {
        (records[a].date, &records[a].module_id).cmp(&(records[b].date, &records[b].module_id))
    });

    let mut cumulative: Vec<Option<f64>> = vec![None; records.len()];
    let mut running = 0.0;
    for index in order {
        running += records[index].credits;
        cumulative[index] = Some(running);
    }

    records
        .iter()
        .zip(cumulative)
        .map(|(record, cumulative_credits)| ExportRow {
            module_id: record.module_id.clone(),
            module_name: record.module_name.clone(),
            credits: record.credits,
            grade: record.grade,
            status: record.status,
            date: record.date,
            cumulative_credits,
        })
        .collect()
}
