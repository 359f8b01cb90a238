//! Derivation of progress and grade series from a record snapshot.
//!
//! All functions are pure: they take a slice of records and return owned,
//! freshly computed sequences. Nothing is cached between calls, so the
//! output always reflects the snapshot it was computed from.

use dashboard_core::grading;
use dashboard_core::models::{
    CreditTotals, GradePoint, ProgressPoint, RecordStatus, StatusCounts, StudyRecord,
};

/// Stateless helper that derives chart inputs from study records.
pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Cumulative earned credits over time.
    ///
    /// Filters to passed records that carry a date, sorts by date with ties
    /// broken by module identifier for determinism, and accumulates a
    /// running credit sum. Passed records without a date are excluded here
    /// but still counted by [`ProgressAggregator::credit_totals`].
    pub fn cumulative_credits(records: &[StudyRecord]) -> Vec<ProgressPoint> {
        let mut completed: Vec<&StudyRecord> = records
            .iter()
            .filter(|r| r.is_passed() && r.date.is_some())
            .collect();
        completed.sort_by(|a, b| (a.date, &a.module_id).cmp(&(b.date, &b.module_id)));

        let mut running = 0.0;
        let mut points = Vec::with_capacity(completed.len());
        for record in completed {
            let Some(date) = record.date else { continue };
            running += record.credits;
            points.push(ProgressPoint {
                date,
                module_id: record.module_id.clone(),
                credits: record.credits,
                cumulative_credits: running,
            });
        }
        points
    }

    /// Earned, dated and total credit sums.
    pub fn credit_totals(records: &[StudyRecord]) -> CreditTotals {
        let mut totals = CreditTotals::default();
        for record in records {
            totals.total += record.credits;
            if record.is_passed() {
                totals.earned += record.credits;
                if record.date.is_some() {
                    totals.dated += record.credits;
                }
            }
        }
        totals
    }

    /// Chronological grade trend over completed (passed or failed) attempts.
    ///
    /// Dated attempts come first, sorted by date with module-id tie
    /// breaking; undated attempts follow, sorted by module id. Every
    /// completed record contributes exactly one point.
    pub fn grade_trend(records: &[StudyRecord]) -> Vec<GradePoint> {
        let mut completed: Vec<&StudyRecord> = records
            .iter()
            .filter(|r| r.status.is_completed())
            .collect();
        // `None` dates must sort last, so invert the option ordering.
        completed.sort_by(|a, b| match (a.date, b.date) {
            (Some(da), Some(db)) => (da, &a.module_id).cmp(&(db, &b.module_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.module_id.cmp(&b.module_id),
        });

        // Completed records always carry a grade (enforced at load time).
        completed
            .into_iter()
            .filter_map(|record| {
                record.grade.map(|grade| GradePoint {
                    date: record.date,
                    module_id: record.module_id.clone(),
                    grade,
                })
            })
            .collect()
    }

    /// Number of records per lifecycle state.
    pub fn status_counts(records: &[StudyRecord]) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in records {
            match record.status {
                RecordStatus::Planned => counts.planned += 1,
                RecordStatus::InProgress => counts.in_progress += 1,
                RecordStatus::Passed => counts.passed += 1,
                RecordStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// ECTS-weighted average grade over passed records, one decimal place.
    pub fn weighted_average_grade(records: &[StudyRecord]) -> Option<f64> {
        grading::weighted_average(records)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

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

    /// The worked scenario from the design discussion: two dated passes and
    /// one open module.
    fn scenario() -> Vec<StudyRecord> {
        vec![
            record(
                "M1",
                5.0,
                Some(2.0),
                RecordStatus::Passed,
                Some(date(2023, 1, 10)),
            ),
            record("M2", 10.0, None, RecordStatus::InProgress, None),
            record(
                "M3",
                5.0,
                Some(4.0),
                RecordStatus::Passed,
                Some(date(2023, 2, 1)),
            ),
        ]
    }

    #[test]
    fn test_cumulative_credits_scenario() {
        let points = ProgressAggregator::cumulative_credits(&scenario());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date(2023, 1, 10));
        assert_eq!(points[0].cumulative_credits, 5.0);
        assert_eq!(points[1].date, date(2023, 2, 1));
        assert_eq!(points[1].cumulative_credits, 10.0);
    }

    #[test]
    fn test_cumulative_credits_non_decreasing() {
        let mut records = scenario();
        records.push(record(
            "M4",
            7.5,
            Some(1.0),
            RecordStatus::Passed,
            Some(date(2023, 1, 20)),
        ));

        let points = ProgressAggregator::cumulative_credits(&records);
        for pair in points.windows(2) {
            assert!(pair[1].cumulative_credits >= pair[0].cumulative_credits);
            assert!(pair[1].date >= pair[0].date);
        }
    }

    #[test]
    fn test_cumulative_credits_ties_broken_by_module_id() {
        let records = vec![
            record(
                "M2",
                5.0,
                Some(2.0),
                RecordStatus::Passed,
                Some(date(2023, 1, 10)),
            ),
            record(
                "M1",
                5.0,
                Some(3.0),
                RecordStatus::Passed,
                Some(date(2023, 1, 10)),
            ),
        ];

        let points = ProgressAggregator::cumulative_credits(&records);
        assert_eq!(points[0].module_id, "M1");
        assert_eq!(points[1].module_id, "M2");
    }

    #[test]
    fn test_cumulative_credits_excludes_undated_passes() {
        let records = vec![
            record("M1", 5.0, Some(2.0), RecordStatus::Passed, None),
            record(
                "M2",
                5.0,
                Some(2.0),
                RecordStatus::Passed,
                Some(date(2023, 3, 1)),
            ),
        ];

        let points = ProgressAggregator::cumulative_credits(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].module_id, "M2");

        // The undated pass still counts toward the earned total.
        let totals = ProgressAggregator::credit_totals(&records);
        assert_eq!(totals.earned, 10.0);
        assert_eq!(totals.dated, 5.0);
    }

    #[test]
    fn test_credit_totals_scenario() {
        let totals = ProgressAggregator::credit_totals(&scenario());
        assert_eq!(totals.earned, 10.0);
        assert_eq!(totals.dated, 10.0);
        assert_eq!(totals.total, 20.0);
    }

    #[test]
    fn test_grade_trend_scenario() {
        let points = ProgressAggregator::grade_trend(&scenario());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].grade, 2.0);
        assert_eq!(points[0].date, Some(date(2023, 1, 10)));
        assert_eq!(points[1].grade, 4.0);
    }

    #[test]
    fn test_grade_trend_length_matches_completed_count() {
        let mut records = scenario();
        records.push(record(
            "M4",
            5.0,
            Some(5.0),
            RecordStatus::Failed,
            Some(date(2023, 1, 15)),
        ));
        records.push(record("M5", 5.0, Some(5.0), RecordStatus::Failed, None));
        records.push(record("M6", 5.0, None, RecordStatus::Planned, None));

        let counts = ProgressAggregator::status_counts(&records);
        let points = ProgressAggregator::grade_trend(&records);
        assert_eq!(points.len(), counts.completed() as usize);
    }

    #[test]
    fn test_grade_trend_undated_sort_last() {
        let records = vec![
            record("M9", 5.0, Some(3.0), RecordStatus::Failed, None),
            record(
                "M1",
                5.0,
                Some(2.0),
                RecordStatus::Passed,
                Some(date(2023, 6, 1)),
            ),
        ];

        let points = ProgressAggregator::grade_trend(&records);
        assert_eq!(points[0].module_id, "M1");
        assert_eq!(points[1].module_id, "M9");
        assert!(points[1].date.is_none());
    }

    #[test]
    fn test_grade_trend_repeated_attempts_each_contribute() {
        let records = vec![
            record(
                "M1",
                5.0,
                Some(5.0),
                RecordStatus::Failed,
                Some(date(2023, 1, 10)),
            ),
            record(
                "M1",
                5.0,
                Some(3.0),
                RecordStatus::Passed,
                Some(date(2023, 3, 10)),
            ),
        ];

        let points = ProgressAggregator::grade_trend(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].grade, 5.0);
        assert_eq!(points[1].grade, 3.0);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(ProgressAggregator::cumulative_credits(&[]).is_empty());
        assert!(ProgressAggregator::grade_trend(&[]).is_empty());
        assert_eq!(ProgressAggregator::credit_totals(&[]), CreditTotals::default());
        assert_eq!(ProgressAggregator::status_counts(&[]).total(), 0);
        assert_eq!(ProgressAggregator::weighted_average_grade(&[]), None);
    }

    #[test]
    fn test_status_counts() {
        let mut records = scenario();
        records.push(record("M7", 5.0, None, RecordStatus::Planned, None));
        records.push(record(
            "M8",
            5.0,
            Some(5.0),
            RecordStatus::Failed,
            Some(date(2023, 4, 1)),
        ));

        let counts = ProgressAggregator::status_counts(&records);
        assert_eq!(counts.passed, 2);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.planned, 1);
    }

    #[test]
    fn test_weighted_average_grade() {
        let avg = ProgressAggregator::weighted_average_grade(&scenario());
        // (2.0 * 5 + 4.0 * 5) / 10 = 3.0
        assert_eq!(avg, Some(3.0));
    }
}
