//! Signal generation: portfolio-agnostic strategies
//!
//! Signals must NEVER depend on portfolio state (positions, cash, equity).
//! They map a bar series to a discrete state per bar and derive the
//! edge-triggered position delta the simulation loop acts on.

pub mod bollinger;
pub mod ma_crossover;
pub mod rsi;

pub use bollinger::BollingerBands;
pub use ma_crossover::MaCrossover;
pub use rsi::RsiStrategy;

use crate::domain::{Bar, SignalRow};
use thiserror::Error;

/// Invalid strategy parameters, surfaced before any simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("{name} must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("period must be >= {min}, got {got}")]
    PeriodTooShort { min: usize, got: usize },

    #[error("short window ({short}) must be < long window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error("overbought ({overbought}) must be > oversold ({oversold})")]
    ThresholdOrder { overbought: f64, oversold: f64 },

    #[error("{name} threshold {value} is on the wrong side of 50")]
    ThresholdSide { name: &'static str, value: f64 },
}

/// Portfolio-agnostic signal source.
///
/// # Invariants
/// - `generate()` returns exactly one row per input bar, in input order
/// - `generate()` is deterministic for the same bar sequence
/// - row `t` depends only on `bars[0..=t]`
pub trait SignalSource: Send + Sync {
    /// Strategy name for manifest/logging
    fn name(&self) -> &str;

    /// Reject parameter sets the strategy cannot run with.
    fn validate(&self) -> Result<(), StrategyError>;

    /// Produce the signal series for `bars`.
    fn generate(&self, bars: &[Bar]) -> Vec<SignalRow>;
}

/// Build signal rows from a discrete state series.
///
/// The position delta is the first difference of `states`; the first row has
/// no predecessor and gets NaN, so the loop skips it.
pub fn edge_trigger(bars: &[Bar], states: &[f64]) -> Vec<SignalRow> {
    debug_assert_eq!(bars.len(), states.len());
    bars.iter()
        .zip(states)
        .enumerate()
        .map(|(i, (bar, &signal))| SignalRow {
            timestamp: bar.timestamp,
            close: bar.close,
            signal,
            position_delta: if i == 0 {
                f64::NAN
            } else {
                signal - states[i - 1]
            },
        })
        .collect()
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), StrategyError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(StrategyError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn edge_trigger_first_row_is_nan() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let rows = edge_trigger(&bars, &[1.0, 1.0, -1.0]);
        assert!(rows[0].is_undefined());
        assert_eq!(rows[1].position_delta, 0.0);
        assert_eq!(rows[2].position_delta, -2.0);
    }

    #[test]
    fn edge_trigger_carries_bar_fields() {
        let bars = make_bars(&[10.0, 11.0]);
        let rows = edge_trigger(&bars, &[0.0, 1.0]);
        assert_eq!(rows[1].timestamp, bars[1].timestamp);
        assert_eq!(rows[1].close, 11.0);
        assert_eq!(rows[1].signal, 1.0);
        assert!(rows[1].is_entry());
    }

    #[test]
    fn edge_trigger_empty() {
        assert!(edge_trigger(&[], &[]).is_empty());
    }

    #[test]
    fn signal_source_is_object_safe() {
        let sources: Vec<Box<dyn SignalSource>> = vec![
            Box::new(MaCrossover::default()),
            Box::new(RsiStrategy::default()),
            Box::new(BollingerBands::default()),
        ];
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["ma_crossover", "rsi", "bollinger_bands"]);
        assert!(sources.iter().all(|s| s.validate().is_ok()));
    }

    #[test]
    fn require_positive_rejects_nan() {
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", 0.5).is_ok());
    }
}
