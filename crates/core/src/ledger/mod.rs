//! Money-movement ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Movement and transaction kind types
//! - Amount validation and balance planning for deposit, withdrawal, transfer
//! - Lock ordering for two-account operations
//! - Balance derivation from recorded movements
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::BalanceSummary;
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{AccountSnapshot, BalanceChange, LedgerPlan, Movement, MovementKind};
