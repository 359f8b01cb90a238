//! Top-level analysis pipeline.
//!
//! Loads a record store, derives every aggregate sequence from one
//! consistent snapshot, and returns a [`StudyOverview`] ready for the
//! shell layer to render or serialise.

use std::path::Path;

use dashboard_core::error::Result;
use dashboard_core::formatting::percentage;
use dashboard_core::models::{CreditTotals, GradePoint, ProgressPoint, StatusCounts, StudyRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::ProgressAggregator;
use crate::store::{LoadOptions, RecordStore};

// ── Public types ──────────────────────────────────────────────────────────────

/// Degree-level goals the summary is measured against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyGoals {
    /// Total ECTS required for the degree.
    pub target_credits: f64,
    /// Desired overall grade.
    pub target_grade: f64,
    /// Planned study duration in semesters.
    pub planned_semesters: u8,
}

impl Default for StudyGoals {
    /// Bachelor defaults: 180 ECTS, grade goal 2.0, six semesters.
    fn default() -> Self {
        Self {
            target_credits: 180.0,
            target_grade: 2.0,
            planned_semesters: 6,
        }
    }
}

/// Aggregated study state measured against the configured goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySummary {
    /// Records per lifecycle state.
    pub counts: StatusCounts,
    /// Earned / dated / total credit sums.
    pub totals: CreditTotals,
    /// Degree target in ECTS.
    pub target_credits: f64,
    /// Earned credits as a percentage of the target, one decimal place.
    pub percent_complete: f64,
    /// ECTS-weighted average grade, absent while nothing is passed.
    pub average_grade: Option<f64>,
    /// Desired overall grade.
    pub target_grade: f64,
    /// `true` when the average grade meets the target (lower is better).
    pub grade_on_target: bool,
    /// Highest semester number present in the records, if any.
    pub current_semester: Option<u8>,
    /// Planned study duration in semesters.
    pub planned_semesters: u8,
    /// `true` while the current semester does not exceed the plan.
    pub on_schedule: bool,
}

impl StudySummary {
    /// Build a summary from a record snapshot and the configured goals.
    pub fn from_records(records: &[StudyRecord], goals: &StudyGoals) -> Self {
        let counts = ProgressAggregator::status_counts(records);
        let totals = ProgressAggregator::credit_totals(records);
        let average_grade = ProgressAggregator::weighted_average_grade(records);

        let current_semester = records.iter().filter_map(|r| r.semester).max();
        let on_schedule = current_semester
            .map(|s| s <= goals.planned_semesters)
            .unwrap_or(true);
        let grade_on_target = average_grade
            .map(|avg| avg <= goals.target_grade)
            .unwrap_or(false);

        Self {
            counts,
            totals,
            target_credits: goals.target_credits,
            percent_complete: percentage(totals.earned, goals.target_credits, 1),
            average_grade,
            target_grade: goals.target_grade,
            grade_on_target,
            current_semester,
            planned_semesters: goals.planned_semesters,
            on_schedule,
        }
    }
}

/// Metadata produced alongside the overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewMetadata {
    /// ISO-8601 timestamp when this overview was generated.
    pub generated_at: String,
    /// Number of records loaded from the source file.
    pub records_loaded: usize,
    /// Wall-clock seconds spent loading the source file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent deriving the aggregate sequences.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_study`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyOverview {
    /// The record snapshot the aggregates were derived from.
    pub records: Vec<StudyRecord>,
    /// Cumulative-credits time series.
    pub progress: Vec<ProgressPoint>,
    /// Grade trend over completed attempts.
    pub grade_trend: Vec<GradePoint>,
    /// Goal-relative summary.
    pub summary: StudySummary,
    /// Metadata about this analysis run.
    pub metadata: OverviewMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Load the record store from `path` (all-or-nothing).
/// 2. Derive the cumulative-credits and grade-trend sequences.
/// 3. Build the goal-relative summary.
///
/// Every derived sequence comes from the same immutable snapshot; nothing
/// is cached across calls.
pub fn analyze_study(
    path: &Path,
    options: &LoadOptions,
    goals: &StudyGoals,
) -> Result<StudyOverview> {
    let load_start = std::time::Instant::now();
    let store = RecordStore::load(path, options)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let aggregate_start = std::time::Instant::now();
    let records = store.all();
    let progress = ProgressAggregator::cumulative_credits(records);
    let grade_trend = ProgressAggregator::grade_trend(records);
    let summary = StudySummary::from_records(records, goals);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    info!(
        "Analyzed {} records: {} earned of {} target ECTS",
        store.len(),
        summary.totals.earned,
        summary.target_credits
    );

    let metadata = OverviewMetadata {
        generated_at: chrono::Utc::now().to_rfc3339(),
        records_loaded: store.len(),
        load_time_seconds: load_time,
        aggregate_time_seconds: aggregate_time,
    };

    Ok(StudyOverview {
        records: store.all().to_vec(),
        progress,
        grade_trend,
        summary,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
