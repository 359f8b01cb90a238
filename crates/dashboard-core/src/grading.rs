//! German university grading scale (1.0 best … 5.0 fail).
//!
//! The scale is discrete: only the listed steps are valid grades. A grade
//! of at most [`PASS_THRESHOLD`] earns the module's credits.

use crate::models::StudyRecord;

/// Valid grade steps with their verbal labels, best first.
pub const GRADE_SCALE: [(f64, &str); 11] = [
    (1.0, "Very good"),
    (1.3, "Very good"),
    (1.7, "Good"),
    (2.0, "Good"),
    (2.3, "Good"),
    (2.7, "Satisfactory"),
    (3.0, "Satisfactory"),
    (3.3, "Satisfactory"),
    (3.7, "Sufficient"),
    (4.0, "Sufficient"),
    (5.0, "Fail"),
];

/// Highest (worst) grade that still passes.
pub const PASS_THRESHOLD: f64 = 4.0;

/// Comparison tolerance for grades parsed from text.
const GRADE_EPSILON: f64 = 1e-6;

/// `true` when `grade` is one of the discrete scale steps.
pub fn is_on_scale(grade: f64) -> bool {
    GRADE_SCALE
        .iter()
        .any(|(step, _)| (grade - step).abs() < GRADE_EPSILON)
}

/// `true` when `grade` earns the module's credits.
pub fn is_passing(grade: f64) -> bool {
    grade <= PASS_THRESHOLD + GRADE_EPSILON
}

/// Verbal label for a grade, or `None` when it is not on the scale.
pub fn label(grade: f64) -> Option<&'static str> {
    GRADE_SCALE
        .iter()
        .find(|(step, _)| (grade - step).abs() < GRADE_EPSILON)
        .map(|(_, text)| *text)
}

/// ECTS-weighted average grade over passed, graded records, rounded to one
/// decimal place.
///
/// Returns `None` when no passed record carries both a grade and a positive
/// credit value.
pub fn weighted_average(records: &[StudyRecord]) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_credits = 0.0;

    for record in records.iter().filter(|r| r.is_passed()) {
        if let Some(grade) = record.grade {
            weighted_sum += grade * record.credits;
            total_credits += record.credits;
        }
    }

    if total_credits > 0.0 {
        Some(round_one_decimal(weighted_sum / total_credits))
    } else {
        None
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
