//! Axis resolution and numeric coercion of raw export rows.
//!
//! Coercion is row-major so that the `Skip` policy can drop a malformed row
//! whole; a table with some cells of a row coerced and others missing is
//! unrepresentable. Under the default `Abort` policy the first unparseable
//! cell fails the entire load.

use kstat_core::cleaning::{parse_quantity, parse_year};
use kstat_core::error::{KstatError, Result};
use kstat_core::models::{Axis, AxisColumn, AxisValue, MetricColumn, TradeTable};
use kstat_core::profile::{AxisSpec, MalformedRow, SourceProfile};
use tracing::{debug, warn};

use crate::reader::RawTable;
use crate::select::select_metric_columns;

/// Build a fully coerced [`TradeTable`] from raw string cells.
pub fn build_table(raw: &RawTable, profile: &SourceProfile) -> Result<TradeTable> {
    let axis_column = profile.axis.column();
    let metric_names = select_metric_columns(&raw.headers, &profile.selection, axis_column)?;

    let axis_index = raw
        .column_index(axis_column)
        .ok_or_else(|| KstatError::MissingColumn(axis_column.to_string()))?;
    let metric_indices = metric_names
        .iter()
        .map(|name| {
            raw.column_index(name)
                .ok_or_else(|| KstatError::MissingColumn(name.clone()))
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut years: Vec<i32> = Vec::new();
    let mut periods: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(raw.len()); metric_names.len()];
    let mut skipped = 0usize;

    for row in &raw.rows {
        let staged = coerce_row(
            row,
            axis_index,
            &profile.axis,
            &metric_names,
            &metric_indices,
            profile.on_malformed,
        )?;

        match staged {
            Some((axis_value, values)) => {
                match axis_value {
                    AxisValue::Year(year) => years.push(year),
                    AxisValue::Period(period) => periods.push(period),
                }
                for (column, value) in columns.iter_mut().zip(values) {
                    column.push(value);
                }
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "rows dropped during coercion");
    }

    let axis_values = match &profile.axis {
        AxisSpec::Year { .. } => Axis::Years(years),
        AxisSpec::Period { .. } => Axis::Periods(periods),
    };

    Ok(TradeTable {
        axis: AxisColumn {
            name: axis_column.to_string(),
            values: axis_values,
        },
        metrics: metric_names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| MetricColumn { name, values })
            .collect(),
    })
}

/// Coerce one row, or decide its fate under the malformed-row policy.
///
/// Returns `Ok(None)` when the row is dropped under [`MalformedRow::Skip`];
/// the first unparseable cell aborts with [`KstatError::ColumnCoercion`]
/// under [`MalformedRow::Abort`].
fn coerce_row(
    row: &[String],
    axis_index: usize,
    axis: &AxisSpec,
    metric_names: &[String],
    metric_indices: &[usize],
    policy: MalformedRow,
) -> Result<Option<(AxisValue, Vec<f64>)>> {
    let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");

    let axis_cell = cell(axis_index);
    let axis_value = match axis {
        AxisSpec::Year { column, suffix } => match parse_year(axis_cell, suffix.as_deref()) {
            Some(year) => AxisValue::Year(year),
            None => return malformed(policy, column, axis_cell),
        },
        AxisSpec::Period { .. } => AxisValue::Period(axis_cell.trim().to_string()),
    };

    let mut values = Vec::with_capacity(metric_indices.len());
    for (name, &index) in metric_names.iter().zip(metric_indices) {
        match parse_quantity(cell(index)) {
            Some(value) => values.push(value),
            None => return malformed(policy, name, cell(index)),
        }
    }

    Ok(Some((axis_value, values)))
}

fn malformed(
    policy: MalformedRow,
    column: &str,
    raw: &str,
) -> Result<Option<(AxisValue, Vec<f64>)>> {
    match policy {
        MalformedRow::Abort => Err(KstatError::ColumnCoercion {
            column: column.to_string(),
            raw: raw.to_string(),
        }),
        MalformedRow::Skip => {
            warn!(column, raw, "dropping row with unparseable cell");
            Ok(None)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
