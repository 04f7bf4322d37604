//! Ledger: sole owner of cash, held quantities, and the executed-trade log.
//!
//! Solvency invariants enforced on every execution:
//! - a BUY never takes cash below zero (notional + commission must fit)
//! - a SELL never exceeds the held quantity
//!
//! A rejected trade leaves cash, positions, and the trade log untouched.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::{Positions, Trade, TradeSide};

/// Reasons the ledger refuses a trade. All are recoverable and bar-local.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("insufficient funds: need {required:.4} (incl. commission), have {available:.4}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient position in '{instrument}': requested {requested}, held {held}")]
    InsufficientPosition {
        instrument: String,
        requested: f64,
        held: f64,
    },

    #[error("invalid order: price={price}, quantity={quantity} (both must be finite and > 0)")]
    InvalidOrder { price: f64, quantity: f64 },
}

/// Construction-time configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerConfigError {
    #[error("initial cash must be finite and >= 0, got {0}")]
    InitialCash(f64),

    #[error("commission rate must be in [0, 1), got {0}")]
    CommissionRate(f64),
}

/// Cash/position ledger for one simulation run.
#[derive(Debug, Clone)]
pub struct Ledger {
    initial_cash: f64,
    cash: f64,
    commission_rate: f64,
    positions: Positions,
    trades: Vec<Trade>,
    total_commission: f64,
}

impl Ledger {
    pub fn new(initial_cash: f64, commission_rate: f64) -> Result<Self, LedgerConfigError> {
        if !initial_cash.is_finite() || initial_cash < 0.0 {
            return Err(LedgerConfigError::InitialCash(initial_cash));
        }
        if !commission_rate.is_finite() || !(0.0..1.0).contains(&commission_rate) {
            return Err(LedgerConfigError::CommissionRate(commission_rate));
        }
        Ok(Self {
            initial_cash,
            cash: initial_cash,
            commission_rate,
            positions: Positions::new(),
            trades: Vec::new(),
            total_commission: 0.0,
        })
    }

    /// Execute a full-fill trade at `price` for `quantity` units.
    ///
    /// Commission is always computed from gross notional and always reduces
    /// cash, on both sides. Returns the appended trade record.
    pub fn execute_trade(
        &mut self,
        instrument: &str,
        timestamp: NaiveDateTime,
        price: f64,
        quantity: f64,
        side: TradeSide,
    ) -> Result<&Trade, LedgerError> {
        if !(price.is_finite() && price > 0.0 && quantity.is_finite() && quantity > 0.0) {
            return Err(LedgerError::InvalidOrder { price, quantity });
        }

        let notional = price * quantity;
        let commission = notional * self.commission_rate;

        match side {
            TradeSide::Buy => {
                let required = notional + commission;
                if required > self.cash {
                    return Err(LedgerError::InsufficientFunds {
                        required,
                        available: self.cash,
                    });
                }
                self.cash -= required;
                self.positions.increase(instrument, quantity);
            }
            TradeSide::Sell => {
                let held = self.positions.quantity(instrument);
                if !self.positions.contains(instrument) || held < quantity {
                    return Err(LedgerError::InsufficientPosition {
                        instrument: instrument.to_string(),
                        requested: quantity,
                        held,
                    });
                }
                self.cash += notional - commission;
                self.positions.decrease(instrument, quantity);
            }
        }

        self.total_commission += commission;
        self.trades.push(Trade {
            instrument: instrument.to_string(),
            timestamp,
            side,
            price,
            quantity,
            value: notional,
            commission,
        });

        log::debug!(
            "{side} {quantity:.6} {instrument} @ {price:.4} (commission {commission:.4}, cash {:.4})",
            self.cash
        );

        // Just pushed above.
        Ok(&self.trades[self.trades.len() - 1])
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    /// Held quantity for an instrument (0.0 if flat).
    pub fn position(&self, instrument: &str) -> f64 {
        self.positions.quantity(instrument)
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn total_commission(&self) -> f64 {
        self.total_commission
    }

    /// Consume the ledger, yielding final cash, positions, and the trade log.
    pub fn into_parts(self) -> (f64, Positions, Vec<Trade>) {
        (self.cash, self.positions, self.trades)
    }
}
