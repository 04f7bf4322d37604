//! Simple Moving Average (SMA).
//!
//! Rolling mean of a bar field (close by default) over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::Bar;
use crate::indicators::{rolling_mean, Indicator};

/// Which bar field an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    Volume,
}

impl PriceField {
    pub fn extract(&self, bars: &[Bar]) -> Vec<f64> {
        match self {
            Self::Close => bars.iter().map(|b| b.close).collect(),
            Self::Volume => bars.iter().map(|b| b.volume).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    field: PriceField,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            field: PriceField::Close,
            name: format!("sma_{period}"),
        }
    }

    /// SMA over traded volume instead of close.
    pub fn volume(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            field: PriceField::Volume,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_mean(&self.field.extract(bars), self.period)
    }
}
