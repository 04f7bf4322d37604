//! Fixed Position Sizer
//!
//! Simplest sizer: trade a fixed quantity or fixed notional amount.

use crate::sizers::Sizer;

/// Fixed position sizer
///
/// Two modes:
/// 1. **Fixed Shares**: Always trade N units (e.g., 100 shares per trade)
/// 2. **Fixed Notional**: Always trade $X worth (e.g., $10,000 per trade)
#[derive(Debug, Clone)]
pub enum FixedSizer {
    /// Fixed number of units per trade
    Shares { quantity: f64 },

    /// Fixed dollar amount per trade
    Notional { amount: f64 },
}

impl FixedSizer {
    /// Create fixed shares sizer
    pub fn shares(quantity: f64) -> Self {
        assert!(quantity > 0.0, "quantity must be > 0");
        Self::Shares { quantity }
    }

    /// Create fixed notional sizer
    pub fn notional(amount: f64) -> Self {
        assert!(amount > 0.0, "amount must be > 0");
        Self::Notional { amount }
    }
}

impl Sizer for FixedSizer {
    fn size(&self, price: f64, _available_cash: f64) -> f64 {
        match self {
            Self::Shares { quantity } => *quantity,
            Self::Notional { amount } => {
                if price <= 0.0 {
                    return 0.0;
                }
                amount / price
            }
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Shares { .. } => "fixed_shares",
            Self::Notional { .. } => "fixed_notional",
        }
    }
}
