use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.kstat-dashboard/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.kstat-dashboard/`
/// - `~/.kstat-dashboard/logs/`
/// - `~/.kstat-dashboard/cache/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let dashboard_dir = home.join(".kstat-dashboard");
    std::fs::create_dir_all(&dashboard_dir)?;
    std::fs::create_dir_all(dashboard_dir.join("logs"))?;
    std::fs::create_dir_all(dashboard_dir.join("cache"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    // CLI level names are uppercase; tracing directives are lowercase.
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-file discovery ────────────────────────────────────────────────────────

/// Locate a trade export when `--file` was not given.
///
/// Checks `./data/` first, then the current directory, and returns the first
/// `.csv` file found (lexicographically smallest). Returns `None` when
/// neither location holds one.
pub fn discover_data_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_data_file_in(&cwd)
}

/// Same as [`discover_data_file`] but rooted at `base_dir` (used for testing).
pub fn discover_data_file_in(base_dir: &Path) -> Option<PathBuf> {
    let candidates = [base_dir.join("data"), base_dir.to_path_buf()];
    candidates
        .iter()
        .flat_map(|dir| kstat_data::reader::find_csv_files(dir))
        .next()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
