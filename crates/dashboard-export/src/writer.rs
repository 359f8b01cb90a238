//! CSV serialization of the export table.

use std::path::Path;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::StudyRecord;
use tracing::info;

use crate::table::{to_export_table, ExportRow};

/// Write export rows to a CSV file at `destination`.
///
/// The header row matches the [`ExportRow`] field names, so a file written
/// here can be loaded back by the record store (the extra
/// `cumulative_credits` column is ignored on load). The header is written
/// even when `rows` is empty; an empty export must still be a loadable file.
pub fn write_csv(rows: &[ExportRow], destination: &Path) -> Result<()> {
    let file = std::fs::File::create(destination).map_err(|source| DashboardError::FileWrite {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(ExportRow::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| DashboardError::FileWrite {
        path: destination.to_path_buf(),
        source,
    })?;

    info!("Exported {} rows to {}", rows.len(), destination.display());
    Ok(())
}

/// Convenience wrapper: build the export table and write it in one step.
pub fn export_records(records: &[StudyRecord], destination: &Path) -> Result<()> {
    write_csv(&to_export_table(records), destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::models::RecordStatus;
    use dashboard_data::store::{LoadOptions, RecordStore};
    use tempfile::TempDir;

    fn record(
        module_id: &str,
        credits: f64,
        grade: Option<f64>,
        status: RecordStatus,
        when: Option<NaiveDate>,
    ) -> StudyRecord {
        StudyRecord {
            module_id: module_id.to_string(),
            module_name: format!("Module {module_id}"),
            credits,
            grade,
            status,
            date: when,
            exam_kind: None,
            semester: None,
            attempt: 1,
        }
    }

    fn sample_records() -> Vec<StudyRecord> {
        vec![
            record(
                "M1",
                5.0,
                Some(2.0),
                RecordStatus::Passed,
                NaiveDate::from_ymd_opt(2023, 1, 10),
            ),
            record("M2", 10.0, None, RecordStatus::InProgress, None),
            record(
                "M3",
                5.0,
                Some(4.0),
                RecordStatus::Passed,
                NaiveDate::from_ymd_opt(2023, 2, 1),
            ),
        ]
    }

    #[test]
    fn test_write_csv_produces_expected_header() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("export.csv");
        export_records(&sample_records(), &dest).unwrap();

        let content = std::fs::read_to_string(&dest).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "module_id,module_name,credits,grade,status,date,cumulative_credits"
        );
        // Header + three data rows.
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn test_write_csv_unwritable_destination() {
        let err = write_csv(&[], Path::new("/no-such-dir/export.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileWrite { .. }));
    }

    #[test]
    fn test_export_then_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("export.csv");
        let records = sample_records();
        export_records(&records, &dest).unwrap();

        // The exported file is a valid source: the extra cumulative column
        // is ignored and the original fields survive.
        let store = RecordStore::load(&dest, &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), records.len());
        for (original, reloaded) in records.iter().zip(store.all()) {
            assert_eq!(reloaded.module_id, original.module_id);
            assert_eq!(reloaded.module_name, original.module_name);
            assert_eq!(reloaded.credits, original.credits);
            assert_eq!(reloaded.grade, original.grade);
            assert_eq!(reloaded.status, original.status);
            assert_eq!(reloaded.date, original.date);
        }
    }

    #[test]
    fn test_empty_export_reloads_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("export.csv");
        export_records(&[], &dest).unwrap();

        // Even with no rows the file carries the header line.
        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(
            content.trim_end(),
            "module_id,module_name,credits,grade,status,date,cumulative_credits"
        );

        let store = RecordStore::load(&dest, &LoadOptions::default()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_export_does_not_mutate_records() {
        let records = sample_records();
        let before = records.clone();
        let _ = to_export_table(&records);
        assert_eq!(records, before);
    }
}
