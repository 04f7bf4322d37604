//! SignalRow: per-bar output of a signal source, consumed by the simulation loop.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One bar of a signal series.
///
/// `signal` is the discrete state {-1, 0, 1}. `position_delta` is its first
/// difference: positive enters/increases long, negative exits/reduces, zero
/// holds, NaN means "insufficient history" and the bar is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub signal: f64,
    pub position_delta: f64,
}

impl SignalRow {
    /// Whether this bar carries no usable position delta.
    pub fn is_undefined(&self) -> bool {
        self.position_delta.is_nan()
    }

    pub fn is_entry(&self) -> bool {
        self.position_delta > 0.0
    }

    pub fn is_exit(&self) -> bool {
        self.position_delta < 0.0
    }
}
