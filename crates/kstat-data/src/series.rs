//! Metric series extraction and summary statistics.
//!
//! The `(axis, value)` pairing is what the chart consumes; the summaries
//! feed the dashboard's per-metric stat boxes.

use kstat_core::error::{KstatError, Result};
use kstat_core::models::TradeTable;
use serde::{Deserialize, Serialize};

/// One charted point: an axis label paired with a metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Pair a metric column with the axis, in source row order.
///
/// Fails with [`KstatError::MissingColumn`] for an unknown metric name.
pub fn metric_series(table: &TradeTable, metric: &str) -> Result<Vec<SeriesPoint>> {
    let column = table
        .metric(metric)
        .ok_or_else(|| KstatError::MissingColumn(metric.to_string()))?;

    Ok(table
        .axis
        .values
        .labels()
        .into_iter()
        .zip(column.values.iter())
        .map(|(label, &value)| SeriesPoint { label, value })
        .collect())
}

/// Summary statistics for one metric across the whole axis.
///
/// All fields are zero for an empty table; `change_pct` is zero whenever the
/// first value is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first: f64,
    pub last: f64,
    /// `last - first` over the loaded range.
    pub change: f64,
    /// Percent change relative to the first value.
    pub change_pct: f64,
}

/// Summarize one metric column.
pub fn summarize(table: &TradeTable, metric: &str) -> Result<MetricSummary> {
    let column = table
        .metric(metric)
        .ok_or_else(|| KstatError::MissingColumn(metric.to_string()))?;
    let values = &column.values;

    if values.is_empty() {
        return Ok(MetricSummary {
            metric: metric.to_string(),
            count: 0,
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            first: 0.0,
            last: 0.0,
            change: 0.0,
            change_pct: 0.0,
        });
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }

    let first = values[0];
    let last = values[values.len() - 1];
    let change = last - first;
    let change_pct = if first == 0.0 {
        0.0
    } else {
        (change / first) * 100.0
    };

    Ok(MetricSummary {
        metric: metric.to_string(),
        count: values.len(),
        min,
        max,
        mean: sum / values.len() as f64,
        first,
        last,
        change,
        change_pct,
    })
}

/// Summaries for every metric column, in resolved order.
pub fn summarize_all(table: &TradeTable) -> Vec<MetricSummary> {
    table
        .metrics
        .iter()
        .filter_map(|column| summarize(table, &column.name).ok())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kstat_core::models::{Axis, AxisColumn, MetricColumn};

    fn table() -> TradeTable {
        TradeTable {
            axis: AxisColumn {
                name: "년".to_string(),
                values: Axis::Years(vec![2021, 2022, 2023, 2024]),
            },
            metrics: vec![
                MetricColumn {
                    name: "수출금액".to_string(),
                    values: vec![100.0, 250.0, 150.0, 400.0],
                },
                MetricColumn {
                    name: "수지".to_string(),
                    values: vec![-50.0, 25.0, -10.0, 80.0],
                },
            ],
        }
    }

    // ── metric_series ─────────────────────────────────────────────────────

    #[test]
    fn test_metric_series_pairs_axis_and_values() {
        let points = metric_series(&table(), "수출금액").expect("series");
        assert_eq!(points.len(), 4);
        assert_eq!(
            points[0],
            SeriesPoint {
                label: "2021".to_string(),
                value: 100.0
            }
        );
        assert_eq!(points[3].label, "2024");
        assert_eq!(points[3].value, 400.0);
    }

    #[test]
    fn test_metric_series_unknown_metric() {
        let err = metric_series(&table(), "성장률").unwrap_err();
        assert!(matches!(err, KstatError::MissingColumn(name) if name == "성장률"));
    }

    #[test]
    fn test_metric_series_preserves_source_order() {
        let mut t = table();
        t.axis.values = Axis::Years(vec![2024, 2021, 2023, 2022]);
        let points = metric_series(&t, "수지").expect("series");
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        // Source row order, not sorted.
        assert_eq!(labels, vec!["2024", "2021", "2023", "2022"]);
    }

    // ── summarize ─────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_basic() {
        let summary = summarize(&table(), "수출금액").expect("summary");
        assert_eq!(summary.count, 4);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 400.0);
        assert!((summary.mean - 225.0).abs() < f64::EPSILON);
        assert_eq!(summary.first, 100.0);
        assert_eq!(summary.last, 400.0);
        assert_eq!(summary.change, 300.0);
        assert!((summary.change_pct - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_negative_values() {
        let summary = summarize(&table(), "수지").expect("summary");
        assert_eq!(summary.min, -50.0);
        assert_eq!(summary.max, 80.0);
        assert_eq!(summary.change, 130.0);
        // First value is negative: -50 → 80 is a -260% change relative to it.
        assert!((summary.change_pct + 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty_table() {
        let empty = TradeTable {
            axis: AxisColumn {
                name: "년".to_string(),
                values: Axis::Years(vec![]),
            },
            metrics: vec![MetricColumn {
                name: "수지".to_string(),
                values: vec![],
            }],
        };
        let summary = summarize(&empty, "수지").expect("summary");
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.change_pct, 0.0);
    }

    #[test]
    fn test_summarize_zero_first_value() {
        let t = TradeTable {
            axis: AxisColumn {
                name: "년".to_string(),
                values: Axis::Years(vec![2023, 2024]),
            },
            metrics: vec![MetricColumn {
                name: "수지".to_string(),
                values: vec![0.0, 42.0],
            }],
        };
        let summary = summarize(&t, "수지").expect("summary");
        assert_eq!(summary.change, 42.0);
        assert_eq!(summary.change_pct, 0.0);
    }

    #[test]
    fn test_summarize_all_in_order() {
        let summaries = summarize_all(&table());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].metric, "수출금액");
        assert_eq!(summaries[1].metric, "수지");
    }
}
