//! Backtest runner: wires configuration, data, signal generation, the
//! simulation loop and performance metrics together.
//!
//! Two entry points:
//! - `run_single_backtest()`: loads bars from the configured CSV, then runs. Used by the CLI.
//! - `run_backtest_from_bars()`: takes pre-loaded bars. Used by sweeps and synthetic runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradesim_core::domain::{Bar, SignalRow};
use tradesim_core::engine::{run_simulation, RunResult, SimulationError};
use tradesim_core::signals::{SignalSource, StrategyError};

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{dataset_hash, load_bars, LoadError, LoadOptions};
use crate::metrics::PerformanceReport;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("no bars to simulate for '{0}'")]
    NoBars(String),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Buy/sell edge counts over a generated signal series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
}

impl SignalCounts {
    pub fn from_rows(rows: &[SignalRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            if row.is_entry() {
                acc.buy += 1;
            } else if row.is_exit() {
                acc.sell += 1;
            }
            acc
        })
    }
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: BacktestConfig,
    pub symbol: String,
    pub strategy: String,
    pub start_date: String,
    pub end_date: String,
    pub metrics: PerformanceReport,
    pub run: RunResult,
    pub bar_count: usize,
    pub signals: SignalCounts,
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

impl BacktestResult {
    pub fn initial_capital(&self) -> f64 {
        self.config.backtest.initial_capital
    }
}

/// Run a single backtest from a `BacktestConfig`, loading bars from its data file.
pub fn run_single_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let opts = LoadOptions {
        start: config.backtest.start_date,
        end: config.backtest.end_date,
    };
    let bars = load_bars(&config.data.file_path, &opts)?;
    run_backtest_from_bars(config, &bars, false)
}

/// Run a backtest over pre-loaded bars. No I/O.
///
/// Bars are used as given; date filtering is the loader's job.
pub fn run_backtest_from_bars(
    config: &BacktestConfig,
    bars: &[Bar],
    has_synthetic: bool,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let symbol = config.data.symbol.clone();
    if bars.is_empty() {
        return Err(RunError::NoBars(symbol));
    }

    let source = config.strategy.source();
    let rows = source.generate(bars);
    let signals = SignalCounts::from_rows(&rows);

    let sizer = config.sizing.build();
    let run = run_simulation(&config.simulation_config(), &rows, sizer.as_ref())?;

    let metrics = PerformanceReport::from_snapshots(
        &run.equity_curve,
        &run.trades,
        config.backtest.risk_free_rate,
        config.backtest.periods_per_year,
    );

    log::info!(
        "{} on {}: {} bars, {} trades, total return {:.2}%",
        source.name(),
        symbol,
        bars.len(),
        run.total_trades,
        metrics.total_return * 100.0
    );

    let date = |bar: Option<&Bar>| bar.map(|b| b.timestamp.date().to_string()).unwrap_or_default();

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        config: config.clone(),
        strategy: source.name().to_string(),
        start_date: date(bars.first()),
        end_date: date(bars.last()),
        metrics,
        run,
        bar_count: bars.len(),
        signals,
        dataset_hash: dataset_hash(bars),
        has_synthetic,
        symbol,
    })
}

/// Validate a signal source and count its buy/sell edges over `bars`.
pub fn count_signals(source: &dyn SignalSource, bars: &[Bar]) -> Result<SignalCounts, RunError> {
    source.validate()?;
    Ok(SignalCounts::from_rows(&source.generate(bars)))
}
