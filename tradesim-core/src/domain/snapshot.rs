//! EquitySnapshot: one point on the equity curve.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Immutable mark-to-market record produced once per simulated bar.
///
/// Identity: `total_equity == cash + position_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub timestamp: NaiveDateTime,
    pub cash: f64,
    pub position_value: f64,
    pub total_equity: f64,
}
