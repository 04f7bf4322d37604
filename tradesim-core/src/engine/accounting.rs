//! Equity tracker: mark-to-market snapshots of ledger state.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::EquitySnapshot;
use crate::engine::ledger::Ledger;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquityError {
    /// A held instrument has no usable current price. Data-integrity problem,
    /// distinct from a normal skipped bar.
    #[error("pricing gap at {timestamp}: no valid price for held instrument '{instrument}'")]
    PricingGap {
        timestamp: NaiveDateTime,
        instrument: String,
    },

    #[error("snapshot at {timestamp} precedes last snapshot at {last}")]
    OutOfOrder {
        timestamp: NaiveDateTime,
        last: NaiveDateTime,
    },
}

/// Append-only equity history.
#[derive(Debug, Clone, Default)]
pub struct EquityTracker {
    history: Vec<EquitySnapshot>,
}

impl EquityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the ledger to market and append one snapshot.
    ///
    /// `prices` must cover every instrument with a held position; prices for
    /// instruments not held are ignored. Timestamps must be non-decreasing.
    pub fn snapshot(
        &mut self,
        timestamp: NaiveDateTime,
        ledger: &Ledger,
        prices: &HashMap<String, f64>,
    ) -> Result<&EquitySnapshot, EquityError> {
        if let Some(last) = self.history.last() {
            if timestamp < last.timestamp {
                return Err(EquityError::OutOfOrder {
                    timestamp,
                    last: last.timestamp,
                });
            }
        }

        let mut position_value = 0.0;
        for (instrument, quantity) in ledger.positions().iter() {
            let price = prices
                .get(instrument.as_str())
                .copied()
                .filter(|p| p.is_finite())
                .ok_or_else(|| EquityError::PricingGap {
                    timestamp,
                    instrument: instrument.clone(),
                })?;
            position_value += quantity * price;
        }

        let cash = ledger.cash();
        self.history.push(EquitySnapshot {
            timestamp,
            cash,
            position_value,
            total_equity: cash + position_value,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    pub fn snapshots(&self) -> &[EquitySnapshot] {
        &self.history
    }

    pub fn last(&self) -> Option<&EquitySnapshot> {
        self.history.last()
    }

    /// Total equity values in snapshot order.
    pub fn total_equity_series(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.total_equity).collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn into_snapshots(self) -> Vec<EquitySnapshot> {
        self.history
    }
}
