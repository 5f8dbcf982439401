//! Metric column resolution.
//!
//! The matching rule lives entirely behind [`select_metric_columns`]; callers
//! only ever see resolved column names, so the heuristic can be swapped for
//! an allow-list without touching them.

use kstat_core::error::{KstatError, Result};
use kstat_core::profile::ColumnSelection;

/// Resolve the selectable metric columns from a normalized header row.
///
/// * `Exact` – returns the declared column list in its declared order, or
///   fails with [`KstatError::MissingColumn`] naming the first absent name.
/// * `Heuristic` – returns every header containing any keyword, excluding
///   the axis column. No failure condition: an empty result means "no
///   selectable metric" and is the caller's decision to surface.
pub fn select_metric_columns(
    headers: &[String],
    selection: &ColumnSelection,
    axis_column: &str,
) -> Result<Vec<String>> {
    match selection {
        ColumnSelection::Exact { columns } => {
            for required in columns {
                if !headers.iter().any(|h| h == required) {
                    return Err(KstatError::MissingColumn(required.clone()));
                }
            }
            Ok(columns.clone())
        }
        ColumnSelection::Heuristic { keywords } => Ok(headers
            .iter()
            .filter(|h| h.as_str() != axis_column)
            .filter(|h| keywords.iter().any(|k| h.contains(k.as_str())))
            .cloned()
            .collect()),
    }
}
