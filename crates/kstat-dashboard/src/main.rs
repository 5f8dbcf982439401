mod bootstrap;

use anyhow::Result;
use kstat_core::formatting::format_quantity;
use kstat_core::models::TradeTable;
use kstat_core::settings::Settings;
use kstat_data::export::export_csv;
use kstat_data::series::{metric_series, summarize_all};
use kstat_runtime::table_manager::TableManager;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("K-stat dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let profile = settings.resolve_profile()?;

    let Some(file) = settings.file.clone().or_else(bootstrap::discover_data_file) else {
        anyhow::bail!("no trade export found; pass --file or place a .csv under ./data");
    };
    tracing::info!(
        "Source: {}, profile: {}, view: {}",
        file.display(),
        profile.name,
        settings.view
    );

    let mut manager = TableManager::new(&file, profile);
    let result = manager.get(false)?;
    let table = &result.table;

    if let Some(export_path) = &settings.export {
        export_csv(table, export_path)?;
        println!("exported {} rows to {}", table.len(), export_path.display());
    }

    let json = settings.format == "json";

    match settings.view.as_str() {
        "columns" => print_columns(table, json)?,
        "table" => print_table(table, json)?,
        "series" => print_series(table, settings.metric.as_deref(), json)?,
        "summary" => print_summary(table, json)?,
        unknown => eprintln!("Unknown view mode: {}", unknown),
    }

    Ok(())
}

// ── Views ──────────────────────────────────────────────────────────────────────

/// List the resolved axis and the selectable metric columns.
fn print_columns(table: &TradeTable, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "axis": table.axis.name,
            "kind": table.axis.values.kind(),
            "metrics": table.metric_names(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("axis: {} ({})", table.axis.name, table.axis.values.kind());
    if table.metrics.is_empty() {
        println!("no selectable metric columns");
        return Ok(());
    }
    println!("metrics:");
    for name in table.metric_names() {
        println!("  {}", name);
    }
    Ok(())
}

/// Print the full normalized table; separators are re-applied for display
/// only, the underlying values stay plain numerics.
fn print_table(table: &TradeTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }

    let mut header = vec![table.axis.name.clone()];
    header.extend(table.metric_names().iter().map(|n| n.to_string()));
    println!("{}", header.join("\t"));

    for i in 0..table.len() {
        let mut row = vec![table.axis.values.label(i).unwrap_or_default()];
        for metric in &table.metrics {
            row.push(format_quantity(metric.values[i]));
        }
        println!("{}", row.join("\t"));
    }
    Ok(())
}

/// Print the `(axis, value)` pairing for the chosen metric.
///
/// Without `--metric` the first resolved column is used, matching the
/// dashboard's default selection.
fn print_series(table: &TradeTable, metric: Option<&str>, json: bool) -> Result<()> {
    let Some(metric) = metric
        .map(|m| m.to_string())
        .or_else(|| table.metric_names().first().map(|n| n.to_string()))
    else {
        println!("no selectable metric columns");
        return Ok(());
    };

    let points = metric_series(table, &metric)?;

    if json {
        let value = serde_json::json!({
            "metric": metric,
            "points": points,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", metric);
    for point in points {
        println!("{}\t{}", point.label, point.value);
    }
    Ok(())
}

/// Print per-metric summary statistics.
fn print_summary(table: &TradeTable, json: bool) -> Result<()> {
    let summaries = summarize_all(table);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("no selectable metric columns");
        return Ok(());
    }

    for s in summaries {
        println!(
            "{}: min={} max={} mean={} change={} ({}%)",
            s.metric,
            format_quantity(s.min),
            format_quantity(s.max),
            format_quantity(s.mean),
            format_quantity(s.change),
            format_quantity(s.change_pct),
        );
    }
    Ok(())
}
