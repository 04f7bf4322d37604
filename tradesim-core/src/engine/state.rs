//! Simulation configuration, per-bar outcomes, and run result types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{EquitySnapshot, Positions, Trade, TradeSide};

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Instrument every signal row prices and trades.
    pub instrument: String,
    pub initial_cash: f64,
    /// Fraction of gross notional charged on every execution.
    pub commission_rate: f64,
}

impl SimulationConfig {
    pub fn new(instrument: impl Into<String>, initial_cash: f64, commission_rate: f64) -> Self {
        Self {
            instrument: instrument.into(),
            initial_cash,
            commission_rate,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new("AAPL", 100_000.0, 0.001)
    }
}

/// A trade request the ledger refused. The run continues past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedTrade {
    pub timestamp: NaiveDateTime,
    pub side: TradeSide,
    pub price: f64,
    pub quantity: f64,
    pub reason: String,
}

/// What a single `step()` did with its row.
#[derive(Debug, Clone, PartialEq)]
pub enum BarOutcome {
    /// NaN position delta: no snapshot, no trade.
    Skipped,
    /// Snapshot taken, zero delta.
    Held,
    Executed(Trade),
    Rejected(RejectedTrade),
}

/// Result of a complete (or cancelled) simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub instrument: String,
    /// One snapshot per non-skipped bar, in bar order.
    pub equity_curve: Vec<EquitySnapshot>,
    /// Every executed trade, in execution order.
    pub trades: Vec<Trade>,
    pub rejected: Vec<RejectedTrade>,
    /// Last snapshot's total equity, or initial cash if no snapshot was taken.
    pub final_equity: f64,
    pub final_cash: f64,
    pub final_positions: Positions,
    pub total_trades: usize,
    pub total_commission: f64,
    /// Rows fed to the loop, skipped ones included.
    pub bars_processed: usize,
    pub skipped_bars: usize,
}

impl RunResult {
    /// Total-equity values of the equity curve, in order.
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|s| s.total_equity).collect()
    }
}
