//! Moving average crossover: long while the fast SMA sits above the slow SMA.
//!
//! State is +1 when short SMA > long SMA, -1 when below, 0 when equal or
//! either average is still warming up.

use serde::{Deserialize, Serialize};

use super::{edge_trigger, SignalSource, StrategyError};
use crate::domain::{Bar, SignalRow};
use crate::indicators::{Indicator, Sma};

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaCrossover {
    pub short_window: usize,
    pub long_window: usize,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }

    /// Raw discrete state per bar.
    pub fn states(&self, bars: &[Bar]) -> Vec<f64> {
        let short = Sma::new(self.short_window.max(1)).compute(bars);
        let long = Sma::new(self.long_window.max(1)).compute(bars);
        short
            .iter()
            .zip(&long)
            .map(|(s, l)| {
                if s > l {
                    1.0
                } else if s < l {
                    -1.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Default for MaCrossover {
    fn default() -> Self {
        Self::new(DEFAULT_SHORT_WINDOW, DEFAULT_LONG_WINDOW)
    }
}

impl SignalSource for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 {
            return Err(StrategyError::NonPositive {
                name: "short_window",
                value: 0.0,
            });
        }
        if self.short_window >= self.long_window {
            return Err(StrategyError::WindowOrder {
                short: self.short_window,
                long: self.long_window,
            });
        }
        Ok(())
    }

    fn generate(&self, bars: &[Bar]) -> Vec<SignalRow> {
        edge_trigger(bars, &self.states(bars))
    }
}
