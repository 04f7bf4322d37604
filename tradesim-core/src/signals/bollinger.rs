//! Bollinger Bands mean-reversion: buy at or below the lower band, sell at or
//! above the upper band. With volume confirmation, any signal on a bar whose
//! volume is below its rolling mean is cancelled.

use serde::{Deserialize, Serialize};

use super::{edge_trigger, require_positive, SignalSource, StrategyError};
use crate::domain::{Bar, SignalRow};
use crate::indicators::bollinger::BollingerSeries;
use crate::indicators::{Bollinger, Indicator, Sma};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerBands {
    pub period: usize,
    pub std_dev: f64,
    pub use_volume: bool,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64, use_volume: bool) -> Self {
        Self {
            period,
            std_dev,
            use_volume,
        }
    }

    pub fn bands(&self, bars: &[Bar]) -> BollingerSeries {
        // A one-bar window has no sample deviation, so its bands stay NaN.
        Bollinger::series(self.period, self.std_dev, bars)
    }

    /// (upper - lower) / middle, for volatility analysis.
    pub fn bandwidth(&self, bars: &[Bar]) -> Vec<f64> {
        self.bands(bars).bandwidth
    }

    /// (close - lower) / (upper - lower), the close's position inside the bands.
    pub fn percent_b(&self, bars: &[Bar]) -> Vec<f64> {
        self.bands(bars).percent_b
    }

    pub fn states(&self, bars: &[Bar]) -> Vec<f64> {
        let bands = self.bands(bars);
        let mut states: Vec<f64> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                // Upper is applied last so a zero-width band touch reads as a sell.
                if bar.close >= bands.upper[i] {
                    -1.0
                } else if bar.close <= bands.lower[i] {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();

        if self.use_volume {
            let volume_mean = Sma::volume(self.period.max(1)).compute(bars);
            for (i, state) in states.iter_mut().enumerate() {
                if bars[i].volume < volume_mean[i] {
                    *state = 0.0;
                }
            }
        }
        states
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(20, 2.0, false)
    }
}

impl SignalSource for BollingerBands {
    fn name(&self) -> &str {
        "bollinger_bands"
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::PeriodTooShort {
                min: 1,
                got: self.period,
            });
        }
        require_positive("std_dev", self.std_dev)
    }

    fn generate(&self, bars: &[Bar]) -> Vec<SignalRow> {
        edge_trigger(bars, &self.states(bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn defaults() {
        let b = BollingerBands::default();
        assert_eq!((b.period, b.std_dev, b.use_volume), (20, 2.0, false));
        assert!(b.validate().is_ok());
    }

    #[test]
    fn close_below_lower_band_buys() {
        // window [10, 10, 10, 10, 5]: mean 9, sample std sqrt(5); lower = 9 - 1*2.236 = 6.76
        let bars = make_bars(&[10.0, 10.0, 10.0, 10.0, 5.0]);
        let states = BollingerBands::new(5, 1.0, false).states(&bars);
        assert_eq!(states[4], 1.0);
    }

    #[test]
    fn close_above_upper_band_sells() {
        let bars = make_bars(&[10.0, 10.0, 10.0, 10.0, 15.0]);
        let rows = BollingerBands::new(5, 1.0, false).generate(&bars);
        assert_eq!(rows[4].signal, -1.0);
        assert_eq!(rows[4].position_delta, -1.0);
    }

    #[test]
    fn low_volume_cancels_signal() {
        let mut bars = make_bars(&[10.0, 10.0, 10.0, 10.0, 15.0]);
        bars[4].volume = 10.0;
        let states = BollingerBands::new(5, 1.0, true).states(&bars);
        assert_eq!(states[4], 0.0);

        bars[4].volume = 5000.0;
        let states = BollingerBands::new(5, 1.0, true).states(&bars);
        assert_eq!(states[4], -1.0);
    }

    #[test]
    fn exposes_bandwidth_and_percent_b() {
        let bars = make_bars(&[10.0, 12.0, 14.0]);
        let b = BollingerBands::new(3, 2.0, false);
        assert_approx(b.bandwidth(&bars)[2], 8.0 / 12.0, DEFAULT_EPSILON);
        assert_approx(b.percent_b(&bars)[2], 0.75, DEFAULT_EPSILON);
    }

    #[test]
    fn one_bar_window_never_signals() {
        let bars = make_bars(&[10.0, 5.0, 20.0, 1.0, 30.0]);
        let b = BollingerBands::new(1, 2.0, false);
        assert!(b.bands(&bars).upper.iter().all(|u| u.is_nan()));
        let rows = b.generate(&bars);
        assert!(rows.iter().all(|r| r.signal == 0.0));
        assert!(!rows.iter().any(|r| r.is_entry() || r.is_exit()));
    }

    #[test]
    fn validation() {
        assert!(BollingerBands::new(0, 2.0, false).validate().is_err());
        assert!(BollingerBands::new(1, 2.0, false).validate().is_ok());
        assert!(BollingerBands::new(20, 0.0, false).validate().is_err());
        assert!(BollingerBands::new(20, -1.0, true).validate().is_err());
    }
}
