//! History domain types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::MovementKind;

/// Kind of a normalized history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryKind {
    /// Deposit into the account.
    Deposit,
    /// Withdrawal from the account.
    Withdraw,
    /// Transfer sent by the account.
    Transfer,
    /// Transfer received from another account.
    TransferReceived,
}

/// One entry of an account's history.
///
/// Amounts are always positive magnitudes; the direction is carried by
/// `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    /// ID of the transaction envelope the entry comes from.
    pub id: i64,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// When the transaction was committed.
    pub created_at: DateTime<Utc>,
    /// Positive amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Recipient display name (sent transfers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Sender display name (received transfers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// Transaction envelope owned by the account whose history is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHeader {
    /// Envelope ID.
    pub id: i64,
    /// Declared kind.
    pub kind: MovementKind,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
}

/// Transfer payload sent by the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransfer {
    /// Stored signed amount (negative).
    pub amount: Decimal,
    /// Recipient display name.
    pub recipient_name: String,
}

/// Transfer payload where the account is the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedTransfer {
    /// ID of the sender's transaction envelope.
    pub transaction_id: i64,
    /// Commit timestamp of the sender's envelope.
    pub created_at: DateTime<Utc>,
    /// Stored signed amount (negative).
    pub amount: Decimal,
    /// Sender display name.
    pub sender_name: String,
}

/// Raw rows fetched from storage for one account.
///
/// Payload maps are keyed by transaction ID.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecords {
    /// Envelopes owned by the account.
    pub headers: Vec<TransactionHeader>,
    /// Deposit amounts.
    pub deposits: HashMap<i64, Decimal>,
    /// Withdrawal amounts.
    pub withdrawals: HashMap<i64, Decimal>,
    /// Outgoing transfers.
    pub transfers: HashMap<i64, SentTransfer>,
    /// Incoming transfers.
    pub received: Vec<ReceivedTransfer>,
}
