//! Domain types for TradeSim

pub mod bar;
pub mod position;
pub mod signal;
pub mod snapshot;
pub mod trade;

pub use bar::Bar;
pub use position::Positions;
pub use signal::SignalRow;
pub use snapshot::EquitySnapshot;
pub use trade::{Trade, TradeSide};

/// Instrument identifier
pub type Symbol = String;
