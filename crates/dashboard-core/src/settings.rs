use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Study-progress dashboard: ECTS progress, grade trend and CSV export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "study-dashboard",
    about = "Study-progress dashboard: ECTS progress, grade trend and CSV export",
    version
)]
pub struct Settings {
    /// Path to the study-records CSV file
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "summary", value_parser = ["summary", "progress", "grades"])]
    pub view: String,

    /// Bar-chart bucketing policy
    #[arg(long, default_value = "module", value_parser = ["module", "monthly"])]
    pub bucket: String,

    /// Line-chart x-axis policy
    #[arg(long, default_value = "date", value_parser = ["date", "index"])]
    pub axis: String,

    /// Write the export table to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Degree target in ECTS credits
    #[arg(long, default_value = "180")]
    pub target_credits: f64,

    /// Target overall grade
    #[arg(long, default_value = "2.0")]
    pub target_grade: f64,

    /// Planned study duration in semesters
    #[arg(long, default_value = "6")]
    pub planned_semesters: u8,

    /// Stop at the first invalid record (the default policy)
    #[arg(long, conflicts_with = "collect")]
    pub strict: bool,

    /// Report every invalid record instead of stopping at the first
    #[arg(long)]
    pub collect: bool,

    /// Print the full overview as JSON instead of rendered text
    #[arg(long)]
    pub json: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.study-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_credits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_semesters: Option<u8>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.study-dashboard/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".study-dashboard").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent
    /// directories if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] but accepts an explicit
    /// argument list, enabling unit-testing without spawning subprocesses.
    pub fn load_with_last_used_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::load_with_last_used_impl(args, &LastUsedParams::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins). 'input' and 'export' are never
        // loaded from last-used.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "bucket") {
            if let Some(v) = last.bucket {
                settings.bucket = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "axis") {
            if let Some(v) = last.axis {
                settings.axis = v;
            }
        }
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "target_credits") {
            if let Some(v) = last.target_credits {
                settings.target_credits = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "target_grade") {
            if let Some(v) = last.target_grade {
                settings.target_grade = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "planned_semesters") {
            if let Some(v) = last.planned_semesters {
                settings.planned_semesters = v;
            }
        }

        settings = Self::apply_debug(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            bucket: Some(s.bucket.clone()),
            axis: Some(s.axis.clone()),
            target_credits: Some(s.target_credits),
            target_grade: Some(s.target_grade),
            planned_semesters: Some(s.planned_semesters),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// rather than filled in from its default value.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches
        .value_source(name)
        .map(|source| source == clap::parser::ValueSource::CommandLine)
        .unwrap_or(false)
}
