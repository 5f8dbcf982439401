//! Encoding-aware reading of delimited trade exports.
//!
//! K-stat agency downloads arrive as CP949 bytes while hand-edited sheets
//! are UTF-8, so the encoding is an input here, never an assumption. Decoding
//! is strict: malformed bytes fail the load instead of degrading into
//! replacement characters that would later poison numeric parsing.

use std::fs;
use std::path::{Path, PathBuf};

use kstat_core::error::{KstatError, Result};
use kstat_core::profile::TextEncoding;
use tracing::{debug, warn};

// ── RawTable ──────────────────────────────────────────────────────────────────

/// Header names plus string cell rows, exactly as read from the export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Whitespace-normalized header names, in source order.
    pub headers: Vec<String>,
    /// String cells, one `Vec` per data row.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of the column named `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read a delimited export into string cells.
///
/// * `encoding` – byte encoding of the file; decoding is strict and a UTF-8
///   byte-order mark is tolerated.
/// * `skip_rows` – leading human-readable title lines dropped before the
///   header row. Skipping past the end of the file yields an empty table.
///
/// Header names are whitespace-trimmed via [`normalize_headers`]. Ragged
/// rows surface as [`KstatError::Csv`].
pub fn load_raw(path: &Path, encoding: TextEncoding, skip_rows: usize) -> Result<RawTable> {
    if !path.exists() {
        return Err(KstatError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let (text, _, had_errors) = encoding.codec().decode(&bytes);
    if had_errors {
        return Err(KstatError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.label(),
        });
    }

    let body = skip_leading_rows(&text, skip_rows);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let headers = normalize_headers(reader.headers()?);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    debug!(
        rows = rows.len(),
        columns = headers.len(),
        source = %path.display(),
        "raw table loaded"
    );

    Ok(RawTable { headers, rows })
}

/// Trim leading/trailing whitespace from every column name.
///
/// Upstream exports often pad headers with stray spaces that would otherwise
/// break exact-name column lookups.
pub fn normalize_headers(headers: &csv::StringRecord) -> Vec<String> {
    headers.iter().map(|h| h.trim().to_string()).collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Drop `skip` leading lines from `text`.
fn skip_leading_rows(text: &str, skip: usize) -> &str {
    let mut rest = text;
    for _ in 0..skip {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

// ── Tests ─────────────────────────────────────────────────────────────────────
