//! Trade: one executed transaction in the ledger's trade log.

use super::Symbol;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an executed trade. Long-only: BUY opens/increases, SELL reduces/closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Classify a position delta: positive → Buy, negative → Sell, zero/NaN → None.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Buy)
        } else if delta < 0.0 {
            Some(Self::Sell)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one executed trade.
///
/// Created exactly once per successful ledger execution and never mutated.
/// `value` is the gross notional (`price * quantity`); commission is recorded
/// separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub instrument: Symbol,
    pub timestamp: NaiveDateTime,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub price: f64,
    pub quantity: f64,
    pub value: f64,
    pub commission: f64,
}

impl Trade {
    /// Net cash impact of the trade on the ledger (negative for buys).
    pub fn cash_flow(&self) -> f64 {
        match self.side {
            TradeSide::Buy => -(self.value + self.commission),
            TradeSide::Sell => self.value - self.commission,
        }
    }
}
