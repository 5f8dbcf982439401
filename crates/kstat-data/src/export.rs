//! Re-export of normalized tables as downloadable CSV.
//!
//! The output is UTF-8 with a byte-order mark (so spreadsheet tools pick up
//! the Korean headers), comma-separated, with values re-serialized from the
//! normalized numeric types rather than the original raw strings: no unit
//! suffix on the axis, no thousands separators on quantities. Re-ingesting
//! an exported file yields the same table.

use std::fs;
use std::io::Write;
use std::path::Path;

use kstat_core::error::Result;
use kstat_core::models::TradeTable;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Write `table` as BOM-prefixed UTF-8 CSV into `writer`.
pub fn write_csv<W: Write>(table: &TradeTable, mut writer: W) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.metrics.len() + 1);
    header.push(table.axis.name.clone());
    header.extend(table.metrics.iter().map(|m| m.name.clone()));
    csv_writer.write_record(&header)?;

    for i in 0..table.len() {
        let mut record = Vec::with_capacity(table.metrics.len() + 1);
        record.push(table.axis.values.label(i).unwrap_or_default());
        for metric in &table.metrics {
            record.push(metric.values[i].to_string());
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `table` to `path`, going through a temp file then renaming so a
/// failed export never leaves a truncated file behind.
pub fn export_csv(table: &TradeTable, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;

    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, &buffer)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingest_table;
    use kstat_core::models::{Axis, AxisColumn, MetricColumn};
    use kstat_core::profile::{SourceProfile, TextEncoding};
    use tempfile::TempDir;

    fn table() -> TradeTable {
        TradeTable {
            axis: AxisColumn {
                name: "년".to_string(),
                values: Axis::Years(vec![2023, 2024]),
            },
            metrics: vec![
                MetricColumn {
                    name: "수출금액".to_string(),
                    values: vec![1_234_567.0, 1_500_250.5],
                },
                MetricColumn {
                    name: "수지".to_string(),
                    values: vec![-532.0, 100.0],
                },
            ],
        }
    }

    #[test]
    fn test_write_csv_has_bom() {
        let mut buffer = Vec::new();
        write_csv(&table(), &mut buffer).expect("write");
        assert!(buffer.starts_with(b"\xef\xbb\xbf"));
    }

    #[test]
    fn test_write_csv_values_unformatted() {
        let mut buffer = Vec::new();
        write_csv(&table(), &mut buffer).expect("write");

        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).expect("utf-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("년,수출금액,수지"));
        // Plain numerics: no suffix, no separators.
        assert_eq!(lines.next(), Some("2023,1234567,-532"));
        assert_eq!(lines.next(), Some("2024,1500250.5,100"));
    }

    #[test]
    fn test_export_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("normalized.csv");

        let original = table();
        export_csv(&original, &path).expect("export");

        // Exported files are UTF-8 and suffix/separator-free; the kstat
        // profile re-ingests them because suffix stripping passes clean
        // values through.
        let mut profile = SourceProfile::kstat();
        profile.encoding = TextEncoding::Utf8;
        profile.selection = kstat_core::profile::ColumnSelection::Exact {
            columns: vec!["수출금액".to_string(), "수지".to_string()],
        };

        let result = ingest_table(&path, &profile).expect("re-ingest");
        assert_eq!(result.table, original);
    }

    #[test]
    fn test_export_csv_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("normalized.csv");
        std::fs::write(&path, b"stale").unwrap();

        export_csv(&table(), &path).expect("export");
        let content = std::fs::read(&path).unwrap();
        assert!(content.starts_with(UTF8_BOM));
        assert!(content.len() > 5);
    }

    #[test]
    fn test_export_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("normalized.csv");
        export_csv(&table(), &path).expect("export");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_csv_empty_table() {
        let empty = TradeTable {
            axis: AxisColumn {
                name: "년".to_string(),
                values: Axis::Years(vec![]),
            },
            metrics: vec![],
        };
        let mut buffer = Vec::new();
        write_csv(&empty, &mut buffer).expect("write");
        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).expect("utf-8");
        assert_eq!(text.trim_end(), "년");
    }
}
