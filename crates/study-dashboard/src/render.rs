//! Plain-text rendering of the dashboard views.
//!
//! The core crates only prepare data; this module turns it into the text
//! the shell prints: a unicode progress bar for earned-vs-target ECTS, a
//! bar chart for the cumulative series and a table for the grade trend.

use std::fmt::Write;

use dashboard_chart::{BarPoint, LinePoint};
use dashboard_core::formatting::{format_credits, format_grade, format_number};
use dashboard_core::grading;
use dashboard_core::models::GradePoint;
use dashboard_data::analysis::StudySummary;

/// Width in terminal columns of the bar portion of rendered bars.
const BAR_WIDTH: usize = 40;

const FILLED: char = '\u{2588}'; // █  FULL BLOCK
const EMPTY: char = '\u{2591}'; // ░  LIGHT SHADE

/// Horizontal progress bar: filled/empty blocks plus a percentage label
/// with the `earned / target` credit counts.
pub fn progress_bar(earned: f64, target: f64) -> String {
    let percentage = if target > 0.0 {
        ((earned / target) * 100.0).min(100.0)
    } else {
        0.0
    };

    let filled = ((percentage / 100.0) * BAR_WIDTH as f64) as usize;
    let empty = BAR_WIDTH.saturating_sub(filled);

    let filled_str: String = std::iter::repeat(FILLED).take(filled).collect();
    let empty_str: String = std::iter::repeat(EMPTY).take(empty).collect();

    format!(
        "{}{} {:.1}% ({}/{} ECTS)",
        filled_str,
        empty_str,
        percentage,
        format_credits(earned),
        format_credits(target),
    )
}

/// Multi-line summary view: progress bar, credit totals, average grade and
/// schedule state.
pub fn summary_view(summary: &StudySummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Degree progress");
    let _ = writeln!(
        out,
        "  {}",
        progress_bar(summary.totals.earned, summary.target_credits)
    );
    let _ = writeln!(
        out,
        "  Earned: {} ECTS  In progress/planned: {} modules  Completed: {} modules",
        format_credits(summary.totals.earned),
        summary.counts.planned + summary.counts.in_progress,
        summary.counts.completed(),
    );

    let grade_line = match summary.average_grade {
        Some(avg) => {
            let marker = if summary.grade_on_target { "meets" } else { "misses" };
            format!(
                "  Average grade: {} ({} target {})",
                format_number(avg, 1),
                marker,
                format_number(summary.target_grade, 1)
            )
        }
        None => "  Average grade: — (nothing passed yet)".to_string(),
    };
    let _ = writeln!(out, "{grade_line}");

    if let Some(semester) = summary.current_semester {
        let schedule = if summary.on_schedule {
            "on schedule"
        } else {
            "behind schedule"
        };
        let _ = writeln!(
            out,
            "  Semester {} of {} planned ({})",
            semester, summary.planned_semesters, schedule
        );
    }

    out
}

/// Bar-chart view of the cumulative-credits series.
///
/// Bars are scaled to the largest value in the series.
pub fn bar_chart(bars: &[BarPoint]) -> String {
    if bars.is_empty() {
        return "No completed modules yet.\n".to_string();
    }

    let max_value = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let label_width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for bar in bars {
        let filled = if max_value > 0.0 {
            ((bar.value / max_value) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar_str: String = std::iter::repeat(FILLED).take(filled).collect();
        let _ = writeln!(
            out,
            "{:<label_width$}  {:<BAR_WIDTH$} {}",
            bar.label,
            bar_str,
            format_credits(bar.value),
        );
    }
    out
}

/// Grade-trend view: one table row per completed attempt, plus the plotted
/// (x, y) pairs it maps to.
pub fn grade_table(points: &[GradePoint], series: &[LinePoint]) -> String {
    if points.is_empty() {
        return "No completed attempts yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:<12} {:>6}  {}", "Date", "Module", "Grade", "Label");
    for point in points {
        let date = point
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string());
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:>6}  {}",
            date,
            point.module_id,
            format_grade(Some(point.grade)),
            grading::label(point.grade).unwrap_or(""),
        );
    }

    let plotted: Vec<String> = series
        .iter()
        .map(|p| format!("({}, {:.1})", format_number(p.x, 0), p.y))
        .collect();
    let _ = writeln!(out, "Series: {}", plotted.join(" "));

    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
