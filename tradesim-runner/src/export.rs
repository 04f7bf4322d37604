//! Artifact export: JSON manifest and CSV series.
//!
//! Provides the export formats for backtest results:
//! - **JSON**: the full `BacktestResult` with a `schema_version` field
//! - **CSV**: equity curve, trade history, drawdown and signal markers for
//!   external analysis and plotting tools
//!
//! Artifacts are exports of a finished run; nothing reads them back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tradesim_core::domain::{EquitySnapshot, SignalRow, Trade};

use crate::metrics::drawdown_series;
use crate::runner::BacktestResult;

fn timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON. Undefined metrics become `null`.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: timestamp, cash, position_value, total_equity
pub fn export_equity_csv(equity_curve: &[EquitySnapshot]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "cash", "position_value", "total_equity"])?;
    for snap in equity_curve {
        wtr.write_record([
            timestamp(snap.timestamp),
            format!("{:.2}", snap.cash),
            format!("{:.2}", snap.position_value),
            format!("{:.2}", snap.total_equity),
        ])?;
    }
    finish(wtr)
}

/// Columns: timestamp, type, price, quantity, value, commission
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "type", "price", "quantity", "value", "commission"])?;
    for t in trades {
        wtr.write_record([
            timestamp(t.timestamp),
            t.side.as_str().to_string(),
            format!("{:.6}", t.price),
            format!("{:.6}", t.quantity),
            format!("{:.2}", t.value),
            format!("{:.2}", t.commission),
        ])?;
    }
    finish(wtr)
}

/// Per-point drawdown from the running peak.
///
/// Columns: timestamp, total_equity, drawdown
pub fn export_drawdown_csv(equity_curve: &[EquitySnapshot]) -> Result<String> {
    let values: Vec<f64> = equity_curve.iter().map(|s| s.total_equity).collect();
    let drawdowns = drawdown_series(&values);

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "total_equity", "drawdown"])?;
    for (snap, dd) in equity_curve.iter().zip(drawdowns) {
        wtr.write_record([
            timestamp(snap.timestamp),
            format!("{:.2}", snap.total_equity),
            format!("{:.6}", dd),
        ])?;
    }
    finish(wtr)
}

/// Signal series with a buy/sell marker on every edge, for price charts.
///
/// Columns: timestamp, close, signal, position_delta, marker
pub fn export_signals_csv(rows: &[SignalRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "close", "signal", "position_delta", "marker"])?;
    for row in rows {
        let marker = if row.is_entry() {
            "buy"
        } else if row.is_exit() {
            "sell"
        } else {
            ""
        };
        let delta = if row.is_undefined() {
            String::new()
        } else {
            row.position_delta.to_string()
        };
        wtr.write_record([
            timestamp(row.timestamp),
            format!("{:.6}", row.close),
            row.signal.to_string(),
            delta,
            marker.to_string(),
        ])?;
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates a directory named `{symbol}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json`: the full `BacktestResult`
/// - `equity_curve.csv`
/// - `trade_history.csv`
/// - `drawdown.csv`
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        result.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let files = [
        ("manifest.json", export_json(result)?),
        ("equity_curve.csv", export_equity_csv(&result.run.equity_curve)?),
        ("trade_history.csv", export_trades_csv(&result.run.trades)?),
        ("drawdown.csv", export_drawdown_csv(&result.run.equity_curve)?),
    ];
    for (name, contents) in &files {
        let path = run_dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    log::info!("saved artifacts to {}", run_dir.display());
    Ok(run_dir)
}
