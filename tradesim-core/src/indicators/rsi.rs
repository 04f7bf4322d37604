//! Relative Strength Index (RSI), simple-average variant.
//!
//! Gains and losses are averaged with a plain rolling mean over `period`
//! bars (not Wilder smoothing). The first bar has no prior close and counts
//! as a zero change, so the first valid value lands at index period-1.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! - avg_loss == 0 and avg_gain > 0 → 100
//! - avg_loss == 0 and avg_gain == 0 → NaN (flat window)

use crate::domain::Bar;
use crate::indicators::{rolling_mean, Indicator};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];

        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            if change.is_nan() {
                gains[i] = f64::NAN;
                losses[i] = f64::NAN;
            } else if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else if l == 0.0 {
                    if g == 0.0 {
                        f64::NAN
                    } else {
                        100.0
                    }
                } else {
                    100.0 - 100.0 / (1.0 + g / l)
                }
            })
            .collect()
    }
}
