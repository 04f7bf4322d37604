//! Parameter sweep over moving-average crossover windows.
//!
//! Every grid point is a fully isolated run over the same immutable bars, so
//! the sweep parallelises with rayon without sharing any mutable state.

use rayon::prelude::*;

use tradesim_core::domain::Bar;
use tradesim_core::signals::MaCrossover;

use crate::config::{BacktestConfig, StrategyConfig};
use crate::runner::{run_backtest_from_bars, BacktestResult, RunError};

/// Parameter grid specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGrid {
    pub ma_short_periods: Vec<usize>,
    pub ma_long_periods: Vec<usize>,
}

impl ParamGrid {
    /// Short periods 10, 20, 30 against long periods 50, 100, 200.
    pub fn ma_crossover_default() -> Self {
        Self {
            ma_short_periods: vec![10, 20, 30],
            ma_long_periods: vec![50, 100, 200],
        }
    }

    /// Number of raw combinations, invalid pairs included.
    pub fn size(&self) -> usize {
        self.ma_short_periods.len() * self.ma_long_periods.len()
    }

    /// One config per valid `(short, long)` pair, in grid order.
    ///
    /// Pairs with `short >= long` are skipped.
    pub fn generate_configs(&self, base_config: &BacktestConfig) -> Vec<BacktestConfig> {
        let mut configs = Vec::new();
        for &short in &self.ma_short_periods {
            for &long in &self.ma_long_periods {
                if short >= long {
                    continue;
                }
                let mut config = base_config.clone();
                config.strategy = StrategyConfig::MaCrossover(MaCrossover::new(short, long));
                configs.push(config);
            }
        }
        configs
    }
}

/// Parameter sweep executor.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    parallel: bool,
}

impl Default for ParamSweep {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ParamSweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every config in the grid over `bars`.
    ///
    /// Fails on the first run error; results keep grid order either way.
    pub fn sweep(
        &self,
        grid: &ParamGrid,
        base_config: &BacktestConfig,
        bars: &[Bar],
        has_synthetic: bool,
    ) -> Result<SweepResults, RunError> {
        let configs = grid.generate_configs(base_config);
        log::info!(
            "sweeping {} configurations ({} skipped as invalid)",
            configs.len(),
            grid.size() - configs.len()
        );

        let run = |config: &BacktestConfig| run_backtest_from_bars(config, bars, has_synthetic);
        let results = if self.parallel {
            configs.par_iter().map(run).collect::<Result<Vec<_>, _>>()?
        } else {
            configs.iter().map(run).collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResults { results })
    }
}

/// Results from a parameter sweep.
#[derive(Debug)]
pub struct SweepResults {
    results: Vec<BacktestResult>,
}

impl SweepResults {
    pub fn all(&self) -> &[BacktestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&BacktestResult> {
        self.results.iter().find(|r| r.run_id == run_id)
    }

    /// Results sorted by Sharpe ratio, best first. Undefined Sharpe sorts last.
    pub fn sorted_by_sharpe(&self) -> Vec<&BacktestResult> {
        let key = |r: &BacktestResult| {
            let s = r.metrics.sharpe_ratio;
            if s.is_nan() {
                f64::NEG_INFINITY
            } else {
                s
            }
        };
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| key(b).total_cmp(&key(a)));
        sorted
    }

    pub fn top_n(&self, n: usize) -> Vec<&BacktestResult> {
        self.sorted_by_sharpe().into_iter().take(n).collect()
    }

    pub fn best(&self) -> Option<&BacktestResult> {
        self.sorted_by_sharpe().into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::generate_synthetic_bars;
    use chrono::NaiveDate;

    fn bars() -> Vec<Bar> {
        generate_synthetic_bars(
            "SPY",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
        )
    }

    fn grid() -> ParamGrid {
        ParamGrid {
            ma_short_periods: vec![10, 20],
            ma_long_periods: vec![50, 100],
        }
    }

    #[test]
    fn grid_size_counts_raw_combinations() {
        assert_eq!(grid().size(), 4);
        assert_eq!(ParamGrid::ma_crossover_default().size(), 9);
    }

    #[test]
    fn grid_filters_invalid_combinations() {
        let grid = ParamGrid {
            ma_short_periods: vec![10, 50, 100],
            ma_long_periods: vec![50, 100],
        };
        let configs = grid.generate_configs(&BacktestConfig::default());

        // Valid: (10,50), (10,100), (50,100)
        assert_eq!(configs.len(), 3);
        for config in &configs {
            match &config.strategy {
                StrategyConfig::MaCrossover(ma) => assert!(ma.short_window < ma.long_window),
                other => panic!("unexpected strategy {other:?}"),
            }
        }
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let bars = bars();
        let base = BacktestConfig::default();
        let serial = ParamSweep::new()
            .with_parallelism(false)
            .sweep(&grid(), &base, &bars, true)
            .unwrap();
        let parallel = ParamSweep::new().sweep(&grid(), &base, &bars, true).unwrap();

        assert_eq!(serial.len(), 4);
        for (a, b) in serial.all().iter().zip(parallel.all()) {
            assert_eq!(a.run_id, b.run_id);
            assert_eq!(a.run, b.run);
        }
    }

    #[test]
    fn sorted_by_sharpe_is_descending() {
        let results = ParamSweep::new()
            .sweep(&grid(), &BacktestConfig::default(), &bars(), true)
            .unwrap();
        let sorted = results.sorted_by_sharpe();
        assert_eq!(sorted.len(), 4);
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0].metrics.sharpe_ratio, pair[1].metrics.sharpe_ratio);
            assert!(b.is_nan() || a >= b);
        }
        assert_eq!(results.best().map(|r| &r.run_id), sorted.first().map(|r| &r.run_id));
        assert!(results.get(&sorted[0].run_id).is_some());
    }

    #[test]
    fn empty_grid_yields_no_results() {
        let grid = ParamGrid {
            ma_short_periods: vec![100],
            ma_long_periods: vec![50],
        };
        let results = ParamSweep::new()
            .sweep(&grid, &BacktestConfig::default(), &bars(), true)
            .unwrap();
        assert!(results.is_empty());
    }
}
