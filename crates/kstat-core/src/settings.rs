use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::KstatError;
use crate::profile::{ColumnSelection, MalformedRow, SourceProfile};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Korea–Italy trade statistics dashboard over K-stat exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "kstat-dashboard",
    about = "Korea-Italy trade statistics dashboard over K-stat exports",
    version
)]
pub struct Settings {
    /// Path to the trade export (auto-discovered when omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Source export profile
    #[arg(long, default_value = "kstat", value_parser = ["kstat", "free-form"])]
    pub profile: String,

    /// Text encoding override (utf-8 | cp949)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Leading title rows to skip before the header row
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Header keyword for heuristic metric matching (repeatable)
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Metric column for the series and summary views
    #[arg(long)]
    pub metric: Option<String>,

    /// View mode
    #[arg(long, default_value = "columns", value_parser = ["columns", "table", "series", "summary"])]
    pub view: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Re-export the normalized table as UTF-8 CSV to this path
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Drop rows with malformed numeric cells instead of aborting the load
    #[arg(long)]
    pub skip_malformed: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.kstat-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.kstat-dashboard/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".kstat-dashboard").join("last_used.json")
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

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
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
            return Self::apply_debug_override(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on the
        // command line (CLI always wins).  'file' is never loaded from
        // last-used; a stale path must not shadow discovery.
        if !is_arg_explicitly_set(&matches, "profile") {
            if let Some(v) = last.profile {
                settings.profile = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "encoding") && settings.encoding.is_none() {
            settings.encoding = last.encoding;
        }
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "skip_rows") && settings.skip_rows.is_none() {
            settings.skip_rows = last.skip_rows;
        }
        if !is_arg_explicitly_set(&matches, "metric") && settings.metric.is_none() {
            settings.metric = last.metric;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        let settings = Self::apply_debug_override(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Apply the `--debug` flag to the log level.
    fn apply_debug_override(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Resolve the effective [`SourceProfile`]: the named built-in profile
    /// with any explicit CLI overrides applied on top.
    pub fn resolve_profile(&self) -> Result<SourceProfile, KstatError> {
        let mut profile = match self.profile.as_str() {
            "kstat" => SourceProfile::kstat(),
            "free-form" => SourceProfile::free_form(),
            other => {
                return Err(KstatError::Config(format!("unknown profile: {}", other)));
            }
        };

        if let Some(encoding) = &self.encoding {
            profile.encoding = encoding.parse()?;
        }
        if let Some(skip_rows) = self.skip_rows {
            profile.skip_rows = skip_rows;
        }
        if !self.keywords.is_empty() {
            profile.selection = ColumnSelection::Heuristic {
                keywords: self.keywords.clone(),
            };
        }
        if self.skip_malformed {
            profile.on_malformed = MalformedRow::Skip;
        }

        Ok(profile)
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            profile: Some(s.profile.clone()),
            encoding: s.encoding.clone(),
            skip_rows: s.skip_rows,
            metric: s.metric.clone(),
            view: Some(s.view.clone()),
            format: Some(s.format.clone()),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
