//! CSV loading for study records.
//!
//! Reads a single tabular source file into an in-memory [`RecordStore`].
//! Loading is all-or-nothing: any format or validation error aborts the
//! load and no store is produced, so a previously held store stays intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::grading;
use dashboard_core::models::{ExamKind, RecordStatus, StudyRecord};
use tracing::{debug, warn};

/// Columns that must be present in the source header row.
const REQUIRED_COLUMNS: [&str; 4] = ["module_id", "module_name", "credits", "status"];

/// Columns that may be present; absent or empty fields become `None`.
const OPTIONAL_COLUMNS: [&str; 5] = ["grade", "date", "exam_kind", "semester", "attempt"];

// ── Load configuration ────────────────────────────────────────────────────────

/// How invariant violations encountered during a load are reported.
///
/// Both policies abort the load; neither drops an invalid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Stop at the first violating record.
    #[default]
    FailFast,
    /// Scan the whole file, then fail reporting every violation.
    CollectAll,
}

/// Options controlling [`RecordStore::load`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub validation: ValidationPolicy,
}

// ── RecordStore ───────────────────────────────────────────────────────────────

/// Immutable in-memory snapshot of all study records from one source file.
///
/// The store exclusively owns its records; reloading means building a new
/// store and dropping the old one wholesale.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<StudyRecord>,
    source: PathBuf,
}

impl RecordStore {
    /// Load a store from a CSV file.
    ///
    /// The first row must be a header naming at least the required columns
    /// `module_id`, `module_name`, `credits` and `status`. The columns
    /// `grade`, `date`, `exam_kind`, `semester` and `attempt` are optional
    /// and unknown columns are ignored, so a file produced by the export
    /// formatter loads back unchanged.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let columns = column_index(reader.headers()?)?;

        let mut records: Vec<StudyRecord> = Vec::new();
        let mut violations: Vec<DashboardError> = Vec::new();

        for (row_index, row_result) in reader.records().enumerate() {
            let row = row_result?;
            // Header occupies line 1; data starts on line 2.
            let line = row
                .position()
                .map(|p| p.line())
                .unwrap_or(row_index as u64 + 2);

            let record = parse_row(&row, &columns, line)?;

            match validate_record(&record, line) {
                Ok(()) => records.push(record),
                Err(violation) => match options.validation {
                    ValidationPolicy::FailFast => return Err(violation),
                    ValidationPolicy::CollectAll => violations.push(violation),
                },
            }
        }

        if !violations.is_empty() {
            return Err(DashboardError::ValidationBatch(violations));
        }

        debug!(
            "Loaded {} records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            records,
            source: path.to_path_buf(),
        })
    }

    /// All records in stable load order.
    pub fn all(&self) -> &[StudyRecord] {
        &self.records
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the source contained no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path the store was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Build a column-name → index map and verify the required columns exist.
fn column_index(headers: &StringRecord) -> Result<HashMap<String, usize>> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !map.contains_key(required) {
            return Err(DashboardError::MissingColumn(required.to_string()));
        }
    }

    for optional in OPTIONAL_COLUMNS {
        if !map.contains_key(optional) {
            debug!("Optional column '{}' not present", optional);
        }
    }

    Ok(map)
}

/// Fetch a field by column name; `None` when the column is absent or empty.
fn field<'a>(
    row: &'a StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    columns
        .get(name)
        .and_then(|&i| row.get(i))
        .filter(|s| !s.is_empty())
}

/// Parse one data row into a [`StudyRecord`].
fn parse_row(
    row: &StringRecord,
    columns: &HashMap<String, usize>,
    line: u64,
) -> Result<StudyRecord> {
    let format_err = |message: String| DashboardError::Format { line, message };

    let module_id = field(row, columns, "module_id")
        .ok_or_else(|| format_err("empty module_id".to_string()))?
        .to_string();
    let module_name = field(row, columns, "module_name")
        .ok_or_else(|| format_err("empty module_name".to_string()))?
        .to_string();

    let credits_raw =
        field(row, columns, "credits").ok_or_else(|| format_err("empty credits".to_string()))?;
    let credits: f64 = credits_raw
        .parse()
        .map_err(|_| format_err(format!("invalid credits value '{credits_raw}'")))?;

    let status_raw =
        field(row, columns, "status").ok_or_else(|| format_err("empty status".to_string()))?;
    let status: RecordStatus = status_raw.parse().map_err(format_err)?;

    let grade: Option<f64> = match field(row, columns, "grade") {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| format_err(format!("invalid grade value '{raw}'")))?,
        ),
        None => None,
    };

    let date: Option<NaiveDate> = match field(row, columns, "date") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| format_err(format!("invalid date '{raw}', expected YYYY-MM-DD")))?,
        ),
        None => None,
    };

    let exam_kind: Option<ExamKind> = match field(row, columns, "exam_kind") {
        Some(raw) => Some(raw.parse().map_err(format_err)?),
        None => None,
    };

    let semester: Option<u8> = match field(row, columns, "semester") {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| format_err(format!("invalid semester '{raw}'")))?,
        ),
        None => None,
    };

    let attempt: u8 = match field(row, columns, "attempt") {
        Some(raw) => raw
            .parse()
            .map_err(|_| format_err(format!("invalid attempt '{raw}'")))?,
        None => 1,
    };

    Ok(StudyRecord {
        module_id,
        module_name,
        credits,
        grade,
        status,
        date,
        exam_kind,
        semester,
        attempt,
    })
}

/// Check the data-model invariants for a parsed record.
fn validate_record(record: &StudyRecord, line: u64) -> Result<()> {
    let violation = |message: String| DashboardError::Validation {
        line,
        module_id: record.module_id.clone(),
        message,
    };

    if record.credits < 0.0 {
        return Err(violation(format!(
            "credits must be >= 0, got {}",
            record.credits
        )));
    }

    match (record.grade, record.status.is_completed()) {
        (Some(grade), true) => {
            if !grading::is_on_scale(grade) {
                return Err(violation(format!("grade {grade} is not on the grading scale")));
            }
            // Status is the source of truth; a mismatch with the grade is
            // suspicious but not fatal.
            if record.status == RecordStatus::Passed && !grading::is_passing(grade) {
                warn!(
                    "Module {} on line {} is marked passed with failing grade {}",
                    record.module_id, line, grade
                );
            }
            if record.status == RecordStatus::Failed && grading::is_passing(grade) {
                warn!(
                    "Module {} on line {} is marked failed with passing grade {}",
                    record.module_id, line, grade
                );
            }
        }
        (Some(grade), false) => {
            return Err(violation(format!(
                "grade {} requires status passed or failed, got {}",
                grade, record.status
            )));
        }
        (None, true) => {
            return Err(violation(format!(
                "status {} requires a grade",
                record.status
            )));
        }
        (None, false) => {}
    }

    if record.attempt == 0 {
        return Err(violation("attempt counter must be >= 1".to_string()));
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    const HEADER: &str = "module_id,module_name,credits,grade,status,date";

    #[test]
    fn test_load_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                HEADER,
                "M1,Scientific Writing,5,2.0,passed,2023-01-10",
                "M2,Medicine I,10,,in_progress,",
            ],
        );

        let store = RecordStore::load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].module_id, "M1");
        assert_eq!(store.all()[0].grade, Some(2.0));
        assert_eq!(store.all()[1].status, RecordStatus::InProgress);
        assert!(store.all()[1].date.is_none());
        assert_eq!(store.source(), path.as_path());
    }

    #[test]
    fn test_load_preserves_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                HEADER,
                "M3,Third,5,,planned,",
                "M1,First,5,,planned,",
                "M2,Second,5,,planned,",
            ],
        );

        let store = RecordStore::load(&path, &LoadOptions::default()).unwrap();
        let ids: Vec<&str> = store.all().iter().map(|r| r.module_id.as_str()).collect();
        assert_eq!(ids, vec!["M3", "M1", "M2"]);
    }

    #[test]
    fn test_load_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &["module_id,module_name,grade,status", "M1,Mod,2.0,passed"],
        );

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::MissingColumn(col) => assert_eq!(col, "credits"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_load_empty_data_is_ok() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "records.csv", &[HEADER]);

        let store = RecordStore::load(&path, &LoadOptions::default()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = RecordStore::load(
            Path::new("/tmp/does-not-exist-dashboard-test/records.csv"),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }

    #[test]
    fn test_load_negative_credits_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[HEADER, "M1,Mod,-1,2.0,passed,2023-01-10"],
        );

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::Validation { line, module_id, .. } => {
                assert_eq!(line, 2);
                assert_eq!(module_id, "M1");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_load_grade_without_terminal_status_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[HEADER, "M1,Mod,5,2.0,in_progress,"],
        );

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_load_terminal_status_without_grade_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "records.csv", &[HEADER, "M1,Mod,5,,passed,"]);

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_load_off_scale_grade_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[HEADER, "M1,Mod,5,2.4,passed,2023-01-10"],
        );

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_load_unknown_status_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "records.csv", &[HEADER, "M1,Mod,5,,done,"]);

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::Format { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("done"));
            }
            other => panic!("expected Format, got {other:?}"),
        }
    }

    #[test]
    fn test_load_bad_date_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[HEADER, "M1,Mod,5,2.0,passed,10.01.2023"],
        );

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Format { .. }));
    }

    #[test]
    fn test_load_collect_all_reports_every_violation() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                HEADER,
                "M1,Mod,-1,2.0,passed,2023-01-10",
                "M2,Mod,5,,planned,",
                "M3,Mod,5,1.5,passed,2023-02-01",
            ],
        );

        let options = LoadOptions {
            validation: ValidationPolicy::CollectAll,
        };
        let err = RecordStore::load(&path, &options).unwrap_err();
        match err {
            DashboardError::ValidationBatch(violations) => assert_eq!(violations.len(), 2),
            other => panic!("expected ValidationBatch, got {other:?}"),
        }
    }

    #[test]
    fn test_load_fail_fast_stops_at_first_violation() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                HEADER,
                "M1,Mod,-1,2.0,passed,2023-01-10",
                "M2,Mod,5,1.5,passed,2023-02-01",
            ],
        );

        let err = RecordStore::load(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::Validation { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_load_ignores_unknown_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                "module_id,module_name,credits,grade,status,date,cumulative_credits",
                "M1,Mod,5,2.0,passed,2023-01-10,5",
            ],
        );

        let store = RecordStore::load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_optional_metadata_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                "module_id,module_name,credits,grade,status,date,exam_kind,semester,attempt",
                "M1,Mod,5,3.3,failed,2023-01-10,exam,1,2",
            ],
        );

        let store = RecordStore::load(&path, &LoadOptions::default()).unwrap();
        let record = &store.all()[0];
        assert_eq!(record.exam_kind, Some(ExamKind::Exam));
        assert_eq!(record.semester, Some(1));
        assert_eq!(record.attempt, 2);
    }

    #[test]
    fn test_load_duplicate_module_ids_allowed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "records.csv",
            &[
                "module_id,module_name,credits,grade,status,date,attempt",
                "M1,Mod,5,5.0,failed,2023-01-10,1",
                "M1,Mod,5,3.0,passed,2023-03-15,2",
            ],
        );

        let store = RecordStore::load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), 2);
    }
}
