//! Memoized loading of the trade table.
//!
//! Wraps [`ingest_table`] with a cache keyed on the source file's identity
//! (length plus modification time). Repeated queries against an unchanged
//! export are served from memory; a changed identity re-ingests. Failed
//! loads are returned as tagged errors, are never cached, and are never
//! retried — corrected input is the only recovery path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use kstat_core::error::{KstatError, Result};
use kstat_core::profile::SourceProfile;
use kstat_data::pipeline::{ingest_table, IngestResult};
use tracing::debug;

// ── FileIdentity ──────────────────────────────────────────────────────────────

/// Identity snapshot of the source export used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    len: u64,
    modified: SystemTime,
}

impl FileIdentity {
    fn probe(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => KstatError::FileNotFound(path.to_path_buf()),
            _ => KstatError::Io(e),
        })?;
        // Filesystems without mtime support still get length-based identity.
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(Self {
            len: meta.len(),
            modified,
        })
    }
}

// ── TableManager ──────────────────────────────────────────────────────────────

/// Memoized wrapper around the ingest pipeline.
///
/// # Example
/// ```no_run
/// use kstat_core::profile::SourceProfile;
/// use kstat_runtime::table_manager::TableManager;
///
/// let mut manager = TableManager::new("trade.csv", SourceProfile::kstat());
/// if let Ok(result) = manager.get(false) {
///     println!("{} rows", result.table.len());
/// }
/// ```
pub struct TableManager {
    /// Source export the table is loaded from.
    path: PathBuf,
    /// Profile the load is resolved under.
    profile: SourceProfile,
    /// Most recent successful load, keyed by the identity it was taken at.
    cache: Option<(FileIdentity, IngestResult)>,
    /// Human-readable description of the last failed load.
    last_error: Option<String>,
    /// Number of pipeline runs performed.
    loads: u32,
}

impl TableManager {
    pub fn new(path: impl Into<PathBuf>, profile: SourceProfile) -> Self {
        Self {
            path: path.into(),
            profile,
            cache: None,
            last_error: None,
            loads: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the normalized table, using the cache while the source file's
    /// identity is unchanged.
    ///
    /// When `force_refresh` is `true` the cache is bypassed and the file is
    /// re-ingested. A failed load surfaces as the tagged error and leaves
    /// any previous cache untouched.
    pub fn get(&mut self, force_refresh: bool) -> Result<&IngestResult> {
        let identity = match FileIdentity::probe(&self.path) {
            Ok(identity) => identity,
            Err(e) => {
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let reuse = !force_refresh
            && matches!(&self.cache, Some((cached, _)) if *cached == identity);

        if !reuse {
            let result = match ingest_table(&self.path, &self.profile) {
                Ok(result) => result,
                Err(e) => {
                    self.last_error = Some(e.to_string());
                    return Err(e);
                }
            };
            debug!(
                rows = result.table.len(),
                source = %self.path.display(),
                "trade table cache updated"
            );
            self.cache = Some((identity, result));
            self.loads += 1;
            self.last_error = None;
        } else {
            debug!("serving cached trade table");
        }

        match &self.cache {
            Some((_, result)) => Ok(result),
            None => Err(KstatError::Config(
                "trade table cache is empty".to_string(),
            )),
        }
    }

    /// Discard the current cache, forcing the next [`TableManager::get`] to
    /// re-ingest.
    pub fn invalidate(&mut self) {
        self.cache = None;
        debug!("trade table cache invalidated");
    }

    /// Human-readable description of the last failed load, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
