use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KstatError, Result};

/// The resolved x-axis value of a single table row.
///
/// Year values come from a labeled source cell (`"2025년"` → `2025`); period
/// values are opaque free text and are never parsed or reinterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Year(i32),
    Period(String),
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Year(year) => write!(f, "{}", year),
            AxisValue::Period(period) => write!(f, "{}", period),
        }
    }
}

/// The resolved axis of a loaded table, in source row order.
///
/// Insertion order equals source row order; the axis is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Years(Vec<i32>),
    Periods(Vec<String>),
}

impl Axis {
    /// Number of rows on this axis.
    pub fn len(&self) -> usize {
        match self {
            Axis::Years(years) => years.len(),
            Axis::Periods(periods) => periods.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display label of row `i` (`"2025"` for a year axis).
    pub fn label(&self, i: usize) -> Option<String> {
        match self {
            Axis::Years(years) => years.get(i).map(|y| y.to_string()),
            Axis::Periods(periods) => periods.get(i).cloned(),
        }
    }

    /// All row labels, in source order.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Axis::Years(years) => years.iter().map(|y| y.to_string()).collect(),
            Axis::Periods(periods) => periods.clone(),
        }
    }

    /// Short kind name used by the column listing ("year" / "period").
    pub fn kind(&self) -> &'static str {
        match self {
            Axis::Years(_) => "year",
            Axis::Periods(_) => "period",
        }
    }
}

/// The named axis column of a [`TradeTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisColumn {
    /// Header name the axis was resolved from (e.g. `"년"` or `"기간"`).
    pub name: String,
    /// Resolved axis values.
    pub values: Axis,
}

/// One fully coerced numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricColumn {
    /// Header name, whitespace-normalized.
    pub name: String,
    /// Parsed values, one per table row.
    pub values: Vec<f64>,
}

/// A normalized trade statistics table: one axis plus fully numeric metric
/// columns of equal length.
///
/// Built once by the ingest pipeline and treated as immutable afterwards;
/// downstream consumers only take read-only views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTable {
    pub axis: AxisColumn,
    pub metrics: Vec<MetricColumn>,
}

impl TradeTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.axis.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the selectable metric columns, in resolved order.
    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name.as_str()).collect()
    }

    /// Look up a metric column by name.
    pub fn metric(&self, name: &str) -> Option<&MetricColumn> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Typed row view for the standard K-stat column set.
    ///
    /// Requires a year axis and the five standard metric columns; fails with
    /// [`KstatError::MissingColumn`] when one is absent, or
    /// [`KstatError::Config`] when the axis is a free-text period.
    pub fn trade_records(&self) -> Result<Vec<TradeRecord>> {
        let years = match &self.axis.values {
            Axis::Years(years) => years,
            Axis::Periods(_) => {
                return Err(KstatError::Config(
                    "trade records require a year axis".to_string(),
                ))
            }
        };

        let export_value = self.metric_values("수출금액")?;
        let export_weight = self.metric_values("수출중량")?;
        let import_value = self.metric_values("수입금액")?;
        let import_weight = self.metric_values("수입중량")?;
        let balance = self.metric_values("수지")?;

        Ok((0..years.len())
            .map(|i| TradeRecord {
                year: years[i],
                export_value: export_value[i],
                export_weight: export_weight[i],
                import_value: import_value[i],
                import_weight: import_weight[i],
                balance: balance[i],
            })
            .collect())
    }

    /// Values of a required metric column.
    fn metric_values(&self, name: &str) -> Result<&[f64]> {
        self.metric(name)
            .map(|m| m.values.as_slice())
            .ok_or_else(|| KstatError::MissingColumn(name.to_string()))
    }
}

/// One row of the standard K-stat Korea–Italy export, fully typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Calendar year, parsed from the labeled source cell.
    pub year: i32,
    /// Export value (thousand USD).
    pub export_value: f64,
    /// Export weight (tons).
    pub export_weight: f64,
    /// Import value (thousand USD).
    pub import_value: f64,
    /// Import weight (tons).
    pub import_weight: f64,
    /// Trade balance (thousand USD); negative on a trade deficit.
    pub balance: f64,
}
