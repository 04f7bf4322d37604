//! RSI mean-reversion: long when oversold, flat-to-short when overbought.

use serde::{Deserialize, Serialize};

use super::{edge_trigger, SignalSource, StrategyError};
use crate::domain::{Bar, SignalRow};
use crate::indicators::{Indicator, Rsi};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiStrategy {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl RsiStrategy {
    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        Self {
            period,
            overbought,
            oversold,
        }
    }

    pub fn rsi(&self, bars: &[Bar]) -> Vec<f64> {
        Rsi::new(self.period.max(1)).compute(bars)
    }

    /// +1 below `oversold`, -1 above `overbought`, 0 otherwise (NaN RSI included).
    pub fn states(&self, bars: &[Bar]) -> Vec<f64> {
        self.rsi(bars)
            .into_iter()
            .map(|r| {
                if r < self.oversold {
                    1.0
                } else if r > self.overbought {
                    -1.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Default for RsiStrategy {
    fn default() -> Self {
        Self::new(14, 70.0, 30.0)
    }
}

impl SignalSource for RsiStrategy {
    fn name(&self) -> &str {
        "rsi"
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::NonPositive {
                name: "period",
                value: 0.0,
            });
        }
        if !(self.overbought > self.oversold) {
            return Err(StrategyError::ThresholdOrder {
                overbought: self.overbought,
                oversold: self.oversold,
            });
        }
        if self.overbought <= 50.0 {
            return Err(StrategyError::ThresholdSide {
                name: "overbought",
                value: self.overbought,
            });
        }
        if self.oversold >= 50.0 {
            return Err(StrategyError::ThresholdSide {
                name: "oversold",
                value: self.oversold,
            });
        }
        Ok(())
    }

    fn generate(&self, bars: &[Bar]) -> Vec<SignalRow> {
        edge_trigger(bars, &self.states(bars))
    }
}
