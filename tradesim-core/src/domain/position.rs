//! Position map: instrument → held quantity (long-only).

use super::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Held quantities keyed by instrument.
///
/// Invariant: every stored quantity is strictly positive. An entry is removed
/// as soon as its quantity reaches exactly zero, never retained at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Positions {
    holdings: BTreeMap<Symbol, f64>,
}

impl Positions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held quantity, or `None` if the instrument has no entry.
    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.holdings.get(instrument).copied()
    }

    /// Held quantity, treating a missing entry as zero.
    pub fn quantity(&self, instrument: &str) -> f64 {
        self.get(instrument).unwrap_or(0.0)
    }

    pub fn contains(&self, instrument: &str) -> bool {
        self.holdings.contains_key(instrument)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.holdings.iter().map(|(k, v)| (k, *v))
    }

    pub(crate) fn increase(&mut self, instrument: &str, quantity: f64) {
        *self.holdings.entry(instrument.to_string()).or_insert(0.0) += quantity;
    }

    /// Decrease a held quantity. Caller guarantees `quantity <= held`.
    pub(crate) fn decrease(&mut self, instrument: &str, quantity: f64) {
        if let Some(held) = self.holdings.get_mut(instrument) {
            *held -= quantity;
            if *held == 0.0 {
                self.holdings.remove(instrument);
            }
        }
    }
}
