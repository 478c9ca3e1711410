//! Account history reconstruction.
//!
//! Deposits, withdrawals, sent transfers, and received transfers live in
//! separate tables. This module merges them into a single time-ordered
//! sequence with a uniform item shape.

pub mod reconstruct;
pub mod types;

pub use reconstruct::HistoryReconstructor;
pub use types::{
    HistoryItem, HistoryKind, HistoryRecords, ReceivedTransfer, SentTransfer, TransactionHeader,
};
