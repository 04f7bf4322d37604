//! Simulation engine: ledger, equity tracking, and the bar-by-bar loop.
//!
//! The engine consumes a precomputed signal series and runs, per bar:
//!
//! 1. Skip check: undefined position delta → no snapshot, no trade
//! 2. Mark-to-market: equity snapshot at the bar's close
//! 3. Sizing: `(price, available_cash) -> quantity`
//! 4. Execution: ledger BUY/SELL, rejections recorded and the run continues

pub mod accounting;
pub mod ledger;
pub mod loop_runner;
pub mod state;

pub use accounting::{EquityError, EquityTracker};
pub use ledger::{Ledger, LedgerConfigError, LedgerError};
pub use loop_runner::{run_simulation, SimulationError, SimulationLoop};
pub use state::{BarOutcome, RejectedTrade, RunResult, SimulationConfig};
