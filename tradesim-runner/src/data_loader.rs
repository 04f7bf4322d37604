//! Bar loading for the runner.
//!
//! Reads OHLCV bars from a flat CSV file with the header
//! `Date,Open,High,Low,Close,Volume` (extra columns are ignored), sorts them
//! chronologically, and optionally clips them to a date range.
//!
//! Synthetic data is a developer-only mode for demos and smoke runs when no
//! CSV is at hand. It is deterministic per symbol.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tradesim_core::domain::Bar;

/// Header names every input file must carry (case-sensitive).
pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("row {row}: {reason}")]
    BadRow { row: usize, reason: String },

    #[error("row {row}: close must be > 0, got {close}")]
    NonPositiveClose { row: usize, close: f64 },

    #[error("no bars left in {}", .0.display())]
    Empty(PathBuf),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Inclusive lower bound on bar date.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on bar date.
    pub end: Option<NaiveDate>,
}

/// Load, sort, and date-filter bars from a CSV file.
pub fn load_bars(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<Vec<Bar>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let bars = filter_date_range(read_bars(file)?, opts.start, opts.end);
    if bars.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    log::info!("loaded {} bars from {}", bars.len(), path.display());
    Ok(bars)
}

/// Parse bars from any CSV source, sorted by timestamp.
pub fn read_bars<R: std::io::Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    let idx = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let cols = REQUIRED_COLUMNS.map(idx);

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Header is line 1; first data row is line 2.
        let row = i + 2;
        let record = record?;
        let field = |c: usize| record.get(cols[c]).unwrap_or("");

        let timestamp = parse_timestamp(field(0)).ok_or_else(|| LoadError::BadRow {
            row,
            reason: format!("unparseable date '{}'", field(0)),
        })?;
        let mut values = [0.0; 5];
        for (k, value) in values.iter_mut().enumerate() {
            *value = parse_number(field(k + 1)).ok_or_else(|| LoadError::BadRow {
                row,
                reason: format!("unparseable {} '{}'", REQUIRED_COLUMNS[k + 1], field(k + 1)),
            })?;
        }
        let [open, high, low, close, volume] = values;
        if close <= 0.0 {
            return Err(LoadError::NonPositiveClose { row, close });
        }

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Keep bars whose date lies in `[start, end]`; either bound may be open.
pub fn filter_date_range(
    bars: Vec<Bar>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Bar> {
    bars.into_iter()
        .filter(|b| {
            let d = b.timestamp.date();
            start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)
        })
        .collect()
}

/// Write bars back out in the input format.
pub fn save_bars_csv(bars: &[Bar], path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(REQUIRED_COLUMNS)?;
    for bar in bars {
        wtr.write_record(&[
            format_timestamp(bar.timestamp),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Compute a deterministic BLAKE3 hash over all bar data.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.timestamp.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Generate synthetic bars for testing/development.
///
/// Produces a weekday-only random walk from a starting price of 100.0,
/// seeded from the symbol name.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar {
            timestamp: current.and_time(chrono::NaiveTime::MIN),
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(chrono::NaiveTime::MIN));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.time() == chrono::NaiveTime::MIN {
        ts.date().to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Empty cells become NaN (a void bar), anything else must parse.
fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(f64::NAN);
    }
    s.parse().ok()
}
