//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Each derived series is a separate Indicator instance:
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//! - Bandwidth: (upper - lower) / middle
//! - PercentB: (close - lower) / (upper - lower)
//!
//! Uses sample stddev (divide by N - 1), so period must be >= 2.
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::{rolling_mean, rolling_std, Indicator};

/// Which Bollinger series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    Bandwidth,
    PercentB,
}

impl BollingerBand {
    fn label(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Middle => "middle",
            Self::Lower => "lower",
            Self::Bandwidth => "bandwidth",
            Self::PercentB => "percent_b",
        }
    }
}

/// All five Bollinger series computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub bandwidth: Vec<f64>,
    pub percent_b: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{}_{period}_{multiplier}", band.label()),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    /// Compute every band at once (the signal generator needs all of them).
    pub fn series(period: usize, multiplier: f64, bars: &[Bar]) -> BollingerSeries {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let middle = rolling_mean(&closes, period);
        let std = rolling_std(&closes, period);

        let upper: Vec<f64> = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m + multiplier * s)
            .collect();
        let lower: Vec<f64> = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m - multiplier * s)
            .collect();
        let bandwidth = (0..bars.len())
            .map(|i| (upper[i] - lower[i]) / middle[i])
            .collect();
        // Zero-width bands make %B undefined (0/0 → NaN, or ±inf).
        let percent_b = (0..bars.len())
            .map(|i| (closes[i] - lower[i]) / (upper[i] - lower[i]))
            .collect();

        BollingerSeries {
            middle,
            upper,
            lower,
            bandwidth,
            percent_b,
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let s = Self::series(self.period, self.multiplier, bars);
        match self.band {
            BollingerBand::Upper => s.upper,
            BollingerBand::Middle => s.middle,
            BollingerBand::Lower => s.lower,
            BollingerBand::Bandwidth => s.bandwidth,
            BollingerBand::PercentB => s.percent_b,
        }
    }
}
