//! Top-level ingest pipeline for trade exports.
//!
//! Orchestrates raw reading, column selection, axis resolution and numeric
//! coercion, returning a normalized table plus load metadata. The pipeline
//! either yields a fully coerced table or a tagged error, never a partially
//! populated one.

use std::path::Path;
use std::time::Instant;

use kstat_core::error::Result;
use kstat_core::models::TradeTable;
use kstat_core::profile::SourceProfile;
use tracing::debug;

use crate::ingest::build_table;
use crate::reader::load_raw;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside a normalized table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IngestMetadata {
    /// Source file the table was loaded from.
    pub source: String,
    /// Name of the profile the load was resolved under.
    pub profile: String,
    /// Encoding label the bytes were decoded with.
    pub encoding: String,
    /// Number of normalized rows.
    pub rows: usize,
    /// Number of resolved metric columns.
    pub metrics: usize,
    /// Wall-clock seconds spent reading and coercing.
    pub load_seconds: f64,
}

/// The complete output of [`ingest_table`].
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub table: TradeTable,
    pub metadata: IngestMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full ingest pipeline.
///
/// 1. Read and decode the export under the profile encoding, skipping the
///    configured leading title rows.
/// 2. Resolve the metric columns (exact or heuristic).
/// 3. Resolve the axis and coerce every metric cell to `f64`.
/// 4. Return the table with load metadata.
pub fn ingest_table(path: &Path, profile: &SourceProfile) -> Result<IngestResult> {
    let started = Instant::now();

    let raw = load_raw(path, profile.encoding, profile.skip_rows)?;
    let table = build_table(&raw, profile)?;

    let metadata = IngestMetadata {
        source: path.display().to_string(),
        profile: profile.name.clone(),
        encoding: profile.encoding.label().to_string(),
        rows: table.len(),
        metrics: table.metrics.len(),
        load_seconds: started.elapsed().as_secs_f64(),
    };

    debug!(
        rows = metadata.rows,
        metrics = metadata.metrics,
        profile = %metadata.profile,
        "trade table ingested"
    );

    Ok(IngestResult { table, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kstat_core::error::KstatError;
    use kstat_core::models::Axis;
    use kstat_core::profile::TextEncoding;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_cp949(dir: &Path, name: &str, content: &str) -> PathBuf {
        let (encoded, _, _) = encoding_rs::EUC_KR.encode(content);
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&encoded).unwrap();
        path
    }

    /// Five-row K-stat fixture in the agency's own formatting.
    fn kstat_fixture(dir: &Path) -> PathBuf {
        write_cp949(
            dir,
            "trade.csv",
            "년,수출금액,수출중량,수입금액,수입중량,수지\n\
             2019년,\"1,234,567\",\"10,100\",\"1,000,000\",\"9,000\",\"234,567\"\n\
             2020년,\"1,100,000\",\"9,800\",\"1,200,000\",\"9,500\",\"-100,000\"\n\
             2021년,\"1,350,000\",\"10,500\",\"1,250,000\",\"9,700\",\"100,000\"\n\
             2022년,\"1,500,250\",\"11,000\",\"1,400,000\",\"10,200\",\"100,250\"\n\
             2023년,\"1,650,750\",\"11,400\",\"1,700,000\",\"10,900\",\"-49,250\"\n",
        )
    }

    #[test]
    fn test_ingest_kstat_fixture() {
        let dir = TempDir::new().unwrap();
        let path = kstat_fixture(dir.path());

        let result = ingest_table(&path, &SourceProfile::kstat()).expect("ingest");
        let table = &result.table;

        assert_eq!(table.len(), 5);
        assert_eq!(
            table.axis.values,
            Axis::Years(vec![2019, 2020, 2021, 2022, 2023])
        );
        assert_eq!(
            table.metric("수출금액").unwrap().values,
            vec![1_234_567.0, 1_100_000.0, 1_350_000.0, 1_500_250.0, 1_650_750.0]
        );

        let records = table.trade_records().expect("records");
        assert_eq!(records.len(), 5);
        assert_eq!(records[1].balance, -100_000.0);
        assert_eq!(records[4].import_weight, 10_900.0);
    }

    #[test]
    fn test_ingest_metadata() {
        let dir = TempDir::new().unwrap();
        let path = kstat_fixture(dir.path());

        let result = ingest_table(&path, &SourceProfile::kstat()).expect("ingest");
        let metadata = &result.metadata;

        assert_eq!(metadata.rows, 5);
        assert_eq!(metadata.metrics, 5);
        assert_eq!(metadata.profile, "kstat");
        assert_eq!(metadata.encoding, "cp949");
        assert!(metadata.load_seconds >= 0.0);
    }

    #[test]
    fn test_ingest_wrong_encoding_fails_decode() {
        let dir = TempDir::new().unwrap();
        let path = kstat_fixture(dir.path());

        // The fixture is CP949; reading it as strict UTF-8 must fail, not
        // degrade into replacement characters.
        let mut profile = SourceProfile::kstat();
        profile.encoding = TextEncoding::Utf8;

        let err = ingest_table(&path, &profile).unwrap_err();
        assert!(matches!(err, KstatError::Decode { .. }));
    }

    #[test]
    fn test_ingest_missing_file() {
        let err = ingest_table(
            Path::new("/tmp/does-not-exist-kstat-pipeline.csv"),
            &SourceProfile::kstat(),
        )
        .unwrap_err();
        assert!(matches!(err, KstatError::FileNotFound(_)));
    }

    #[test]
    fn test_ingest_free_form_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(
            &path,
            "기간,수출액,수입액,무역수지,성장률\n\
             2024 상반기,\"1,000\",900,100,5.2\n\
             2024 하반기,\"1,100\",950,150,-1.5\n",
        )
        .unwrap();

        let result = ingest_table(&path, &SourceProfile::free_form()).expect("ingest");
        let table = &result.table;
        assert_eq!(
            table.metric_names(),
            vec!["수출액", "수입액", "무역수지", "성장률"]
        );
        assert_eq!(table.metric("성장률").unwrap().values, vec![5.2, -1.5]);
        assert_eq!(table.axis.values.labels(), vec!["2024 상반기", "2024 하반기"]);
    }
}
