//! Bar-by-bar simulation loop: drives the ledger and equity tracker from a
//! signal series.
//!
//! Per row:
//! 1. NaN position delta → skip (no snapshot, no trade)
//! 2. Snapshot equity at the row's close (before any trade)
//! 3. Nonzero delta → size and submit BUY (delta > 0) or SELL (delta < 0)
//! 4. Ledger rejection → record, warn, continue with the next row
//!
//! A pricing gap during the snapshot is fatal. Rows may be fed one at a time
//! through `step()`, so a caller can stop early and still `finish()` with a
//! consistent partial result.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{SignalRow, TradeSide};
use crate::engine::accounting::{EquityError, EquityTracker};
use crate::engine::ledger::{Ledger, LedgerConfigError};
use crate::sizers::Sizer;

use super::state::{BarOutcome, RejectedTrade, RunResult, SimulationConfig};

/// Errors that abort a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid ledger configuration: {0}")]
    Config(#[from] LedgerConfigError),

    #[error("pricing gap at {timestamp}: no valid price for held instrument '{instrument}'")]
    PricingGap {
        timestamp: chrono::NaiveDateTime,
        instrument: String,
    },

    #[error(transparent)]
    Equity(EquityError),
}

impl From<EquityError> for SimulationError {
    fn from(err: EquityError) -> Self {
        match err {
            EquityError::PricingGap {
                timestamp,
                instrument,
            } => Self::PricingGap {
                timestamp,
                instrument,
            },
            other => Self::Equity(other),
        }
    }
}

/// Exclusive owner of one run's ledger and equity history.
pub struct SimulationLoop<'s> {
    instrument: String,
    ledger: Ledger,
    tracker: EquityTracker,
    sizer: &'s dyn Sizer,
    prices: HashMap<String, f64>,
    rejected: Vec<RejectedTrade>,
    bars_processed: usize,
    skipped_bars: usize,
}

impl<'s> SimulationLoop<'s> {
    pub fn new(config: &SimulationConfig, sizer: &'s dyn Sizer) -> Result<Self, SimulationError> {
        let ledger = Ledger::new(config.initial_cash, config.commission_rate)?;
        Ok(Self {
            instrument: config.instrument.clone(),
            ledger,
            tracker: EquityTracker::new(),
            sizer,
            prices: HashMap::with_capacity(1),
            rejected: Vec::new(),
            bars_processed: 0,
            skipped_bars: 0,
        })
    }

    /// Process one signal row.
    pub fn step(&mut self, row: &SignalRow) -> Result<BarOutcome, SimulationError> {
        self.bars_processed += 1;

        if row.is_undefined() {
            self.skipped_bars += 1;
            return Ok(BarOutcome::Skipped);
        }

        self.prices.insert(self.instrument.clone(), row.close);
        self.tracker
            .snapshot(row.timestamp, &self.ledger, &self.prices)?;

        let Some(side) = TradeSide::from_delta(row.position_delta) else {
            return Ok(BarOutcome::Held);
        };

        let quantity = self.sizer.size(row.close, self.ledger.cash());
        match self
            .ledger
            .execute_trade(&self.instrument, row.timestamp, row.close, quantity, side)
        {
            Ok(trade) => Ok(BarOutcome::Executed(trade.clone())),
            Err(err) => {
                log::warn!(
                    "{} rejected at {}: {side} {quantity:.6} @ {:.4}: {err}",
                    self.instrument,
                    row.timestamp,
                    row.close
                );
                let rejected = RejectedTrade {
                    timestamp: row.timestamp,
                    side,
                    price: row.close,
                    quantity,
                    reason: err.to_string(),
                };
                self.rejected.push(rejected.clone());
                Ok(BarOutcome::Rejected(rejected))
            }
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn tracker(&self) -> &EquityTracker {
        &self.tracker
    }

    /// Materialize the result from whatever has been processed so far.
    pub fn finish(self) -> RunResult {
        let final_equity = self
            .tracker
            .last()
            .map(|s| s.total_equity)
            .unwrap_or_else(|| self.ledger.initial_cash());
        let total_commission = self.ledger.total_commission();
        let (final_cash, final_positions, trades) = self.ledger.into_parts();

        RunResult {
            instrument: self.instrument,
            equity_curve: self.tracker.into_snapshots(),
            total_trades: trades.len(),
            trades,
            rejected: self.rejected,
            final_equity,
            final_cash,
            final_positions,
            total_commission,
            bars_processed: self.bars_processed,
            skipped_bars: self.skipped_bars,
        }
    }
}

/// Run a full simulation over `rows`.
pub fn run_simulation(
    config: &SimulationConfig,
    rows: &[SignalRow],
    sizer: &dyn Sizer,
) -> Result<RunResult, SimulationError> {
    log::info!(
        "simulating {} bars of {} (cash {:.2}, commission {}, sizer {})",
        rows.len(),
        config.instrument,
        config.initial_cash,
        config.commission_rate,
        sizer.name()
    );

    let mut sim = SimulationLoop::new(config, sizer)?;
    for row in rows {
        sim.step(row)?;
    }
    let result = sim.finish();

    log::info!(
        "simulation finished: {} trades, {} rejected, {} skipped, final equity {:.2}",
        result.total_trades,
        result.rejected.len(),
        result.skipped_bars,
        result.final_equity
    );
    Ok(result)
}
