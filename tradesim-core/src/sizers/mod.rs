//! Position Sizers: determine trade quantity
//!
//! Sizers translate a price and the cash currently available into a quantity.
//! They never check affordability: the ledger is the sole enforcer of solvency,
//! so a sizer may happily propose a trade the ledger will reject.

pub mod fixed;
pub mod fraction;

pub use fixed::FixedSizer;
pub use fraction::FixedFraction;

/// Position sizing contract: `(price > 0, available_cash >= 0) -> quantity`.
pub trait Sizer: Send + Sync {
    /// Quantity to trade at `price` given `available_cash`.
    ///
    /// Returns 0.0 when no sensible size exists (e.g. non-positive price);
    /// the ledger rejects zero-quantity requests.
    fn size(&self, price: f64, available_cash: f64) -> f64;

    /// Sizer name for manifest/logging
    fn name(&self) -> &str;
}

impl<F> Sizer for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn size(&self, price: f64, available_cash: f64) -> f64 {
        self(price, available_cash)
    }

    fn name(&self) -> &str {
        "custom"
    }
}
