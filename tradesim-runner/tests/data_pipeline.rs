//! Integration tests for the runner's data pipeline: CSV on disk → bars.

use chrono::NaiveDate;
use std::path::Path;
use tradesim_runner::data_loader::{
    dataset_hash, generate_synthetic_bars, load_bars, save_bars_csv, LoadError, LoadOptions,
};

const PRICES: &str = "\
Date,Open,High,Low,Close,Volume,Adj Close
2024-01-04,102,104,101,103,1200,103
2024-01-02,100,102,99,101,1000,101
2024-01-03,101,103,100,102,1100,102
2024-01-05,103,105,102,104,1300,104
";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn loads_sorted_bars_ignoring_extra_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "prices.csv", PRICES);

    let bars = load_bars(&path, &LoadOptions::default()).unwrap();
    assert_eq!(bars.len(), 4);
    assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(bars[0].close, 101.0);
    assert_eq!(bars[3].volume, 1300.0);
}

#[test]
fn date_range_clips_loaded_bars() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "prices.csv", PRICES);

    let opts = LoadOptions {
        start: Some(d(2024, 1, 3)),
        end: Some(d(2024, 1, 4)),
    };
    let bars = load_bars(&path, &opts).unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].timestamp.date(), d(2024, 1, 3));
}

#[test]
fn range_that_excludes_everything_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "prices.csv", PRICES);

    let opts = LoadOptions {
        start: Some(d(2030, 1, 1)),
        end: None,
    };
    assert!(matches!(load_bars(&path, &opts), Err(LoadError::Empty(_))));
}

#[test]
fn missing_file_is_reported_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_bars(dir.path().join("nope.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn missing_columns_fail_before_any_row_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "Date,Close\n2024-01-02,100\n");
    assert!(matches!(
        load_bars(&path, &LoadOptions::default()),
        Err(LoadError::MissingColumns(_))
    ));
}

#[test]
fn saved_bars_reload_identically() {
    let dir = tempfile::tempdir().unwrap();
    let bars = generate_synthetic_bars("SPY", d(2024, 1, 1), d(2024, 3, 31));
    let path = dir.path().join("processed").join("spy.csv");

    save_bars_csv(&bars, &path).unwrap();
    let reloaded = load_bars(&path, &LoadOptions::default()).unwrap();

    assert_eq!(reloaded, bars);
    assert_eq!(dataset_hash(&reloaded), dataset_hash(&bars));
}
