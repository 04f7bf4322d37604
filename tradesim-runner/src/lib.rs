//! TradeSim Runner: backtest orchestration, metrics, config, data and export.
//!
//! This crate builds on `tradesim-core` to provide:
//! - TOML backtest configuration
//! - CSV bar loading with a synthetic fallback for demos
//! - Single-backtest runner producing metrics and a full run record
//! - Performance metrics over the equity curve and trade log
//! - CSV/JSON artifact export
//! - Parallel parameter sweeps

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError, RunId, SizingConfig, StrategyConfig};
pub use data_loader::{load_bars, LoadError, LoadOptions};
pub use metrics::PerformanceReport;
pub use runner::{
    count_signals, run_backtest_from_bars, run_single_backtest, BacktestResult, RunError,
    SignalCounts,
};
pub use sweep::{ParamGrid, ParamSweep, SweepResults};
