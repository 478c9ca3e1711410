//! Core ledger logic for the wallet.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage adapters read locked account state, ask this crate what to write,
//! and persist the answer atomically.
//!
//! # Modules
//!
//! - `ledger` - Deposit, withdrawal and transfer planning
//! - `limits` - Daily deposit/withdrawal ceilings
//! - `history` - Chronological history reconstruction
//! - `auth` - Password hashing

pub mod auth;
pub mod history;
pub mod ledger;
pub mod limits;
