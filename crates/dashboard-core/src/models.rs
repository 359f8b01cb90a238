use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a single module attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Enrolled in the curriculum but not yet started.
    Planned,
    /// Currently being worked on, no grade yet.
    InProgress,
    /// Completed with a passing grade.
    Passed,
    /// Completed with a failing grade.
    Failed,
}

impl RecordStatus {
    /// `true` for the two terminal states that carry a grade.
    pub fn is_completed(self) -> bool {
        matches!(self, RecordStatus::Passed | RecordStatus::Failed)
    }

    /// Canonical lowercase name, as written to export files.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Planned => "planned",
            RecordStatus::InProgress => "in_progress",
            RecordStatus::Passed => "passed",
            RecordStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    /// Accepts the canonical snake_case names plus the hyphenated spelling
    /// used by some exports (`in-progress`). Matching is case-insensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(RecordStatus::Planned),
            "in_progress" | "in-progress" => Ok(RecordStatus::InProgress),
            "passed" => Ok(RecordStatus::Passed),
            "failed" => Ok(RecordStatus::Failed),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// The kind of examination a module is assessed with.
///
/// Optional metadata column; the aggregations do not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamKind {
    /// Timed written exam.
    Exam,
    /// Advanced workbook handed in over several weeks.
    Workbook,
    /// Portfolio of graded tasks.
    Portfolio,
}

impl std::str::FromStr for ExamKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exam" | "written_exam" => Ok(ExamKind::Exam),
            "workbook" | "advanced_workbook" => Ok(ExamKind::Workbook),
            "portfolio" => Ok(ExamKind::Portfolio),
            other => Err(format!("unknown exam kind '{other}'")),
        }
    }
}

/// One row of study data: a single attempt at a module.
///
/// Invariants (enforced when a store is loaded):
/// * `credits >= 0`
/// * a present grade implies `status` is `Passed` or `Failed`
/// * an absent grade implies `status` is `Planned` or `InProgress`
/// * a present grade lies on the grading scale (see [`crate::grading`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Module identifier, unique within a curriculum. Repeated attempts at
    /// the same module reuse the identifier.
    pub module_id: String,
    /// Human-readable module name.
    pub module_name: String,
    /// ECTS credit value of the module.
    pub credits: f64,
    /// Grade on the 1.0 (best) to 5.0 (fail) scale, absent until completed.
    #[serde(default)]
    pub grade: Option<f64>,
    /// Lifecycle state of this attempt.
    pub status: RecordStatus,
    /// Calendar date of the grade/attempt, if known.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Examination kind, if recorded.
    #[serde(default)]
    pub exam_kind: Option<ExamKind>,
    /// Semester number this module belongs to, if recorded.
    #[serde(default)]
    pub semester: Option<u8>,
    /// Attempt counter, starting at 1.
    #[serde(default = "default_attempt")]
    pub attempt: u8,
}

fn default_attempt() -> u8 {
    1
}

impl StudyRecord {
    /// `true` when this attempt earned its credits.
    pub fn is_passed(&self) -> bool {
        self.status == RecordStatus::Passed
    }
}

/// A derived point on the cumulative-credits time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// Date the credits were earned.
    pub date: NaiveDate,
    /// Module whose completion produced this point.
    pub module_id: String,
    /// Credits earned by this single completion.
    pub credits: f64,
    /// Running total of earned credits up to and including this point.
    pub cumulative_credits: f64,
}

/// A derived point on the grade trend, one per completed attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradePoint {
    /// Date of the attempt; undated attempts sort after all dated ones.
    pub date: Option<NaiveDate>,
    /// Module the grade belongs to.
    pub module_id: String,
    /// The grade achieved.
    pub grade: f64,
}

/// Earned-credit totals split by date availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditTotals {
    /// Credits from all passed records, dated or not.
    pub earned: f64,
    /// Credits from passed records that carry a date (the time series).
    pub dated: f64,
    /// Credits of every record in the store, regardless of status.
    pub total: f64,
}

/// Number of records per lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub planned: u32,
    pub in_progress: u32,
    pub passed: u32,
    pub failed: u32,
}

impl StatusCounts {
    /// Total number of records counted.
    pub fn total(&self) -> u32 {
        self.planned + self.in_progress + self.passed + self.failed
    }

    /// Number of completed (passed or failed) records.
    pub fn completed(&self) -> u32 {
        self.passed + self.failed
    }
}
