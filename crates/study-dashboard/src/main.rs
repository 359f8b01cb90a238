mod bootstrap;
mod render;

use anyhow::{bail, Context, Result};
use dashboard_chart::{to_bar_series, to_line_series, BarBucketing, LineAxis};
use dashboard_core::settings::Settings;
use dashboard_data::analysis::{analyze_study, StudyGoals};
use dashboard_data::store::{LoadOptions, ValidationPolicy};
use dashboard_export::export_records;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Study Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Bucket: {}, Axis: {}",
        settings.view,
        settings.bucket,
        settings.axis
    );

    let Some(input) = settings.input.as_deref() else {
        bail!("no input file given; pass --input <records.csv>");
    };

    let options = LoadOptions {
        validation: if settings.collect {
            ValidationPolicy::CollectAll
        } else {
            ValidationPolicy::FailFast
        },
    };
    let goals = StudyGoals {
        target_credits: settings.target_credits,
        target_grade: settings.target_grade,
        planned_semesters: settings.planned_semesters,
    };

    let overview = analyze_study(input, &options, &goals)
        .with_context(|| format!("loading {}", input.display()))?;

    let bucketing = match settings.bucket.as_str() {
        "monthly" => BarBucketing::Monthly,
        _ => BarBucketing::PerModule,
    };
    let axis = match settings.axis.as_str() {
        "index" => LineAxis::Index,
        _ => LineAxis::Date,
    };

    let bar_series = to_bar_series(&overview.progress, bucketing);
    let line_series = to_line_series(&overview.grade_trend, axis);

    if settings.json {
        let payload = serde_json::json!({
            "overview": overview,
            "bar_series": bar_series,
            "line_series": line_series,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        match settings.view.as_str() {
            "progress" => print!("{}", render::bar_chart(&bar_series)),
            "grades" => print!(
                "{}",
                render::grade_table(&overview.grade_trend, &line_series)
            ),
            // "summary" and anything clap let through.
            _ => print!("{}", render::summary_view(&overview.summary)),
        }
    }

    if let Some(destination) = settings.export.as_deref() {
        export_records(&overview.records, destination)
            .with_context(|| format!("exporting to {}", destination.display()))?;
        println!("Exported {} records to {}", overview.records.len(), destination.display());
    }

    Ok(())
}
