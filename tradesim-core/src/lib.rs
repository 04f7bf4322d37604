//! TradeSim Core: ledger, equity tracking, simulation loop, indicators, signals.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, trades, positions, equity snapshots, signal rows)
//! - Ledger enforcing cash and position solvency
//! - Equity tracker producing the mark-to-market curve
//! - Bar-by-bar simulation loop with per-bar trade rejection recovery
//! - Position sizers
//! - Indicators and portfolio-agnostic signal sources

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod signals;
pub mod sizers;
