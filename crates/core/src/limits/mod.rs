//! Daily movement limits.
//!
//! Pure policy evaluated by the validation layer before a deposit or
//! withdrawal reaches the ledger. The ledger itself never consults it.

pub mod policy;

#[cfg(test)]
mod policy_props;

pub use policy::{DatedAmount, LimitConfigError, LimitKind, LimitPolicy};
