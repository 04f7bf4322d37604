//! Fixed-fraction sizer: commit a fixed share of available cash per trade.

use crate::sizers::Sizer;

/// Default fraction of available cash committed per trade.
pub const DEFAULT_FRACTION: f64 = 0.02;

/// Sizes each trade as `fraction * available_cash / price`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFraction {
    fraction: f64,
}

impl FixedFraction {
    pub fn new(fraction: f64) -> Self {
        assert!(
            fraction > 0.0 && fraction <= 1.0,
            "fraction must be in (0, 1], got {fraction}"
        );
        Self { fraction }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl Default for FixedFraction {
    fn default() -> Self {
        Self::new(DEFAULT_FRACTION)
    }
}

impl Sizer for FixedFraction {
    fn size(&self, price: f64, available_cash: f64) -> f64 {
        if price <= 0.0 || available_cash <= 0.0 {
            return 0.0;
        }
        available_cash * self.fraction / price
    }

    fn name(&self) -> &str {
        "fixed_fraction"
    }
}
