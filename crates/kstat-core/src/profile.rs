//! Source-export profiles.
//!
//! The dashboard understands two export conventions from the same
//! statistical agency: the standard K-stat download (CP949 bytes, a fixed
//! header set, a year axis labeled with a trailing `년`) and hand-edited
//! free-form sheets (UTF-8, arbitrary headers matched by keyword, an opaque
//! period axis). A profile captures one convention as plain data, resolved
//! once at startup so the variability never leaks past the pipeline
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KstatError;

/// Axis column name of the standard K-stat export.
pub const KSTAT_AXIS_COLUMN: &str = "년";

/// Metric column names of the standard K-stat export, in display order.
pub const KSTAT_METRIC_COLUMNS: [&str; 5] =
    ["수출금액", "수출중량", "수입금액", "수입중량", "수지"];

/// Axis column name of free-form exports.
pub const FREE_FORM_AXIS_COLUMN: &str = "기간";

/// Default header keywords for heuristic metric matching: value/amount,
/// weight, balance, and both rate spellings.
pub const DEFAULT_KEYWORDS: [&str; 5] = ["액", "중량", "수지", "률", "율"];

// ── TextEncoding ──────────────────────────────────────────────────────────────

/// Byte encoding of a source export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// UTF-8, with or without a byte-order mark.
    Utf8,
    /// Legacy Korean-locale code page (Windows 949 / extended EUC-KR).
    Cp949,
}

impl TextEncoding {
    /// The `encoding_rs` codec implementing this encoding.
    pub fn codec(self) -> &'static encoding_rs::Encoding {
        match self {
            TextEncoding::Utf8 => encoding_rs::UTF_8,
            TextEncoding::Cp949 => encoding_rs::EUC_KR,
        }
    }

    /// Canonical label used in error messages and metadata.
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp949 => "cp949",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = KstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "cp949" | "euc-kr" | "euckr" => Ok(TextEncoding::Cp949),
            other => Err(KstatError::Config(format!("unknown encoding: {}", other))),
        }
    }
}

// ── Axis and column selection ─────────────────────────────────────────────────

/// How the x-axis column is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisSpec {
    /// Integer years, optionally labeled with a trailing unit marker.
    Year {
        column: String,
        suffix: Option<String>,
    },
    /// Opaque categorical periods; the text is never parsed.
    Period { column: String },
}

impl AxisSpec {
    /// Header name of the axis column.
    pub fn column(&self) -> &str {
        match self {
            AxisSpec::Year { column, .. } => column,
            AxisSpec::Period { column } => column,
        }
    }
}

/// How the selectable metric columns are resolved from the header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSelection {
    /// A fixed enumerated column set; every name must be present.
    Exact { columns: Vec<String> },
    /// Every non-axis header containing any keyword; may resolve to none.
    Heuristic { keywords: Vec<String> },
}

/// Policy for rows with cells that fail numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRow {
    /// Fail the whole load on the first unparseable cell.
    #[default]
    Abort,
    /// Drop the entire offending row and log it; never a single cell.
    Skip,
}

// ── SourceProfile ─────────────────────────────────────────────────────────────

/// One export convention, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Short profile name for logs and metadata.
    pub name: String,
    pub encoding: TextEncoding,
    /// Leading human-readable title rows above the header row.
    pub skip_rows: usize,
    pub axis: AxisSpec,
    pub selection: ColumnSelection,
    pub on_malformed: MalformedRow,
}

impl SourceProfile {
    /// The standard K-stat agency download.
    pub fn kstat() -> Self {
        Self {
            name: "kstat".to_string(),
            encoding: TextEncoding::Cp949,
            skip_rows: 0,
            axis: AxisSpec::Year {
                column: KSTAT_AXIS_COLUMN.to_string(),
                suffix: Some("년".to_string()),
            },
            selection: ColumnSelection::Exact {
                columns: KSTAT_METRIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            },
            on_malformed: MalformedRow::Abort,
        }
    }

    /// Hand-edited free-form sheets with keyword-matched headers.
    pub fn free_form() -> Self {
        Self {
            name: "free-form".to_string(),
            encoding: TextEncoding::Utf8,
            skip_rows: 0,
            axis: AxisSpec::Period {
                column: FREE_FORM_AXIS_COLUMN.to_string(),
            },
            selection: ColumnSelection::Heuristic {
                keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            },
            on_malformed: MalformedRow::Abort,
        }
    }
}
