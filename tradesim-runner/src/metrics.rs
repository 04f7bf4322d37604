//! Performance metrics: pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or trade list in, scalar out.
//! Degenerate inputs that leave a statistic undefined (zero variance, too few
//! returns) yield a non-finite value rather than a fabricated 0.0, so callers
//! can tell "no signal" from "flat".

use serde::{Deserialize, Serialize};
use tradesim_core::domain::{EquitySnapshot, Trade};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;

/// Aggregate performance report for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub cagr: f64,
    pub volatility: f64,
    pub trade_count: usize,
}

impl PerformanceReport {
    /// Compute all metrics from an equity curve and trade log.
    pub fn compute(
        equity_curve: &[f64],
        trades: &[Trade],
        risk_free_rate: f64,
        periods_per_year: u32,
    ) -> Self {
        let returns = period_returns(equity_curve);
        Self {
            total_return: total_return(equity_curve),
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate, periods_per_year),
            max_drawdown: max_drawdown(equity_curve),
            win_rate: win_rate(trades),
            cagr: cagr(equity_curve, periods_per_year),
            volatility: volatility(&returns, periods_per_year),
            trade_count: trades.len(),
        }
    }

    /// Convenience over snapshot records.
    pub fn from_snapshots(
        snapshots: &[EquitySnapshot],
        trades: &[Trade],
        risk_free_rate: f64,
        periods_per_year: u32,
    ) -> Self {
        let curve: Vec<f64> = snapshots.iter().map(|s| s.total_equity).collect();
        Self::compute(&curve, trades, risk_free_rate, periods_per_year)
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Simple returns between consecutive equity points. The first point has no
/// predecessor and produces no return.
pub fn period_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(&first), Some(&last)) if equity_curve.len() >= 2 && first > 0.0 => {
            (last - first) / first
        }
        _ => 0.0,
    }
}

/// Annualized Sharpe ratio.
///
/// Sharpe = sqrt(ppy) * mean(excess) / std(excess), excess = returns - rf / ppy,
/// sample std. NaN with fewer than two returns; ±inf or NaN at zero variance.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }
    let ppy = f64::from(periods_per_year);
    let per_period_rf = risk_free_rate / ppy;
    let excess: Vec<f64> = returns.iter().map(|r| r - per_period_rf).collect();
    let m = mean(&excess);
    let variance = sample_variance(&excess);
    // Rounding in the mean leaves a tiny residual on a flat series; treat it as zero.
    let flat = excess.iter().all(|&e| e == excess[0]);
    if flat || variance <= f64::EPSILON * m * m {
        return m / 0.0;
    }
    ppy.sqrt() * m / variance.sqrt()
}

/// Maximum drawdown as a non-positive fraction (e.g. -0.15 = 15% drawdown).
///
/// Running peak only looks backward. 0.0 for an empty curve.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    drawdown_series(equity_curve)
        .into_iter()
        .fold(0.0_f64, f64::min)
}

/// Per-point drawdown from the running peak, for plotting.
pub fn drawdown_series(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve
        .iter()
        .map(|&eq| {
            peak = peak.max(eq);
            if peak > 0.0 {
                (eq - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}

/// Fraction of logged trades whose recorded value is positive.
///
/// Trade value is gross notional, so every executed trade counts; this is a
/// participation rate, not a round-trip profitability measure.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.value > 0.0).count();
    winners as f64 / trades.len() as f64
}

/// Compound annual growth rate: (last / first)^(ppy / points) - 1.
///
/// The exponent uses the number of equity points, not elapsed periods.
pub fn cagr(equity_curve: &[f64], periods_per_year: u32) -> f64 {
    let (Some(&first), Some(&last)) = (equity_curve.first(), equity_curve.last()) else {
        return 0.0;
    };
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let years = equity_curve.len() as f64 / f64::from(periods_per_year);
    (last / first).powf(1.0 / years) - 1.0
}

/// Annualized volatility: sample std of returns * sqrt(ppy). NaN with fewer
/// than two returns.
pub fn volatility(returns: &[f64], periods_per_year: u32) -> f64 {
    sample_std(returns) * f64::from(periods_per_year).sqrt()
}

// ─── Helpers ────────────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tradesim_core::domain::TradeSide;

    fn make_trade(side: TradeSide, price: f64, quantity: f64) -> Trade {
        Trade {
            instrument: "SPY".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            side,
            price,
            quantity,
            value: price * quantity,
            commission: price * quantity * 0.001,
        }
    }

    // ── Returns ──

    #[test]
    fn period_returns_drop_first_point() {
        let r = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn period_returns_empty_and_single() {
        assert!(period_returns(&[]).is_empty());
        assert!(period_returns(&[100.0]).is_empty());
    }

    // ── Total return ──

    #[test]
    fn total_return_positive() {
        let eq = vec![100_000.0, 100_500.0, 101_000.0, 110_000.0];
        assert!((total_return(&eq) - 0.1).abs() < 1e-10);
    }

    #[test]
    fn total_return_single_bar() {
        assert_eq!(total_return(&[100_000.0]), 0.0);
        assert_eq!(total_return(&[]), 0.0);
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_constant_equity_is_not_finite() {
        let eq = vec![100_000.0; 100];
        let s = sharpe_ratio(&period_returns(&eq), 0.01, 252);
        assert!(!s.is_finite(), "got {s}");
    }

    #[test]
    fn sharpe_flat_curve_of_any_length_is_not_finite() {
        for n in [3, 60, 253, 1000] {
            let eq = vec![100_000.0; n];
            let s = sharpe_ratio(&period_returns(&eq), 0.01, 252);
            assert!(!s.is_finite(), "n={n}: got {s}");
            assert!(s < 0.0, "n={n}: flat equity earns less than rf, got {s}");
        }
        let report = PerformanceReport::compute(&vec![100_000.0; 60], &[], 0.01, 252);
        assert!(!report.sharpe_ratio.is_finite());
    }

    #[test]
    fn sharpe_zero_excess_at_zero_variance_is_nan() {
        let eq = vec![100_000.0; 30];
        assert!(sharpe_ratio(&period_returns(&eq), 0.0, 252).is_nan());
    }

    #[test]
    fn sharpe_constant_nonzero_return_is_infinite() {
        let s = sharpe_ratio(&[0.001; 50], 0.0, 252);
        assert_eq!(s, f64::INFINITY);
    }

    #[test]
    fn sharpe_too_few_returns_is_nan() {
        assert!(sharpe_ratio(&[], 0.01, 252).is_nan());
        assert!(sharpe_ratio(&[0.01], 0.01, 252).is_nan());
    }

    #[test]
    fn sharpe_known_value() {
        // returns [0.01, 0.03], rf 0: mean 0.02, sample std sqrt(0.0002)
        let s = sharpe_ratio(&[0.01, 0.03], 0.0, 252);
        let expected = 252.0_f64.sqrt() * 0.02 / 0.0002_f64.sqrt();
        assert!((s - expected).abs() < 1e-9);
    }

    #[test]
    fn sharpe_subtracts_per_period_risk_free() {
        let returns = [0.01, 0.03];
        let no_rf = sharpe_ratio(&returns, 0.0, 252);
        let with_rf = sharpe_ratio(&returns, 0.252, 252);
        // rf/ppy = 0.001 shifts the mean, not the std
        let expected = 252.0_f64.sqrt() * 0.019 / 0.0002_f64.sqrt();
        assert!(with_rf < no_rf);
        assert!((with_rf - expected).abs() < 1e-9);
    }

    // ── Max drawdown ──

    #[test]
    fn drawdown_increasing_is_zero() {
        assert_eq!(max_drawdown(&[100.0, 101.0, 102.0, 150.0]), 0.0);
    }

    #[test]
    fn drawdown_halve_then_recover() {
        assert!((max_drawdown(&[100.0, 50.0, 100.0]) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn drawdown_uses_running_peak_only() {
        // Later, higher peak must not affect the earlier dip.
        let dd = drawdown_series(&[100.0, 90.0, 200.0, 180.0]);
        assert!((dd[1] - (-0.1)).abs() < 1e-12);
        assert_eq!(dd[2], 0.0);
        assert!((dd[3] - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn drawdown_empty_is_zero() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert!(drawdown_series(&[]).is_empty());
    }

    // ── Win rate ──

    #[test]
    fn win_rate_empty_is_zero() {
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn win_rate_single_positive_value() {
        assert_eq!(win_rate(&[make_trade(TradeSide::Buy, 100.0, 10.0)]), 1.0);
    }

    #[test]
    fn win_rate_counts_positive_values() {
        let mut zero = make_trade(TradeSide::Sell, 100.0, 1.0);
        zero.value = 0.0;
        let trades = [make_trade(TradeSide::Buy, 100.0, 1.0), zero];
        assert_eq!(win_rate(&trades), 0.5);
    }

    // ── CAGR ──

    #[test]
    fn cagr_uses_point_count() {
        // 252 points doubling → exactly 100% over one "year" of points
        let mut eq = vec![100.0; 252];
        eq[251] = 200.0;
        assert!((cagr(&eq, 252) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cagr_half_year_compounds() {
        // 126 points, +10% → (1.1)^2 - 1
        let mut eq = vec![100.0; 126];
        eq[125] = 110.0;
        assert!((cagr(&eq, 252) - 0.21).abs() < 1e-12);
    }

    #[test]
    fn cagr_fewer_than_two_points() {
        assert_eq!(cagr(&[], 252), 0.0);
        assert_eq!(cagr(&[100.0], 252), 0.0);
    }

    // ── Volatility ──

    #[test]
    fn volatility_known_value() {
        let v = volatility(&[0.01, 0.03], 252);
        assert!((v - 0.0002_f64.sqrt() * 252.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn volatility_too_few_returns_is_nan() {
        assert!(volatility(&[0.01], 252).is_nan());
        assert!(volatility(&[], 252).is_nan());
    }

    // ── Report ──

    #[test]
    fn report_aggregates_everything() {
        let eq = vec![100.0, 50.0, 100.0];
        let trades = vec![
            make_trade(TradeSide::Buy, 100.0, 1.0),
            make_trade(TradeSide::Sell, 50.0, 1.0),
        ];
        let report = PerformanceReport::compute(&eq, &trades, 0.01, 252);
        assert_eq!(report.trade_count, 2);
        assert_eq!(report.win_rate, 1.0);
        assert!((report.max_drawdown - (-0.5)).abs() < 1e-12);
        assert_eq!(report.total_return, 0.0);
        assert!(report.sharpe_ratio.is_finite());
        assert!(report.volatility > 0.0);
    }

    #[test]
    fn report_on_empty_run() {
        let report = PerformanceReport::compute(&[], &[], 0.01, 252);
        assert_eq!(report.trade_count, 0);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.cagr, 0.0);
        assert!(report.sharpe_ratio.is_nan());
        assert!(report.volatility.is_nan());
    }

    #[test]
    fn report_on_run_without_trades_has_undefined_sharpe() {
        use tradesim_core::domain::SignalRow;
        use tradesim_core::engine::{run_simulation, SimulationConfig};
        use tradesim_core::sizers::FixedSizer;

        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rows: Vec<SignalRow> = (0..100)
            .map(|i| SignalRow {
                timestamp: start + chrono::Duration::days(i),
                close: 100.0 + i as f64,
                signal: 0.0,
                position_delta: if i == 0 { f64::NAN } else { 0.0 },
            })
            .collect();
        let config = SimulationConfig::new("SPY", 100_000.0, 0.001);
        let run = run_simulation(&config, &rows, &FixedSizer::shares(10.0)).unwrap();
        assert!(run.trades.is_empty());

        let report = PerformanceReport::from_snapshots(&run.equity_curve, &run.trades, 0.01, 252);
        assert_eq!(report.total_return, 0.0);
        assert!(report.volatility.abs() < 1e-12);
        assert!(!report.sharpe_ratio.is_finite(), "got {}", report.sharpe_ratio);
    }
}
