//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;
use wallet_shared::types::AccountId;

use super::types::MovementKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount is zero, negative, or has sub-cent precision.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Movement would leave the balance negative.
    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The debited account.
        account_id: AccountId,
        /// Balance before the movement.
        balance: Decimal,
        /// Requested amount.
        requested: Decimal,
    },

    /// Sender and recipient are the same account.
    #[error("Cannot transfer to the same account")]
    SelfTransfer,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // ========== Integrity Errors ==========
    /// A transaction envelope has no payload of its declared kind.
    #[error("Transaction {transaction_id} of kind {kind} has no matching movement")]
    MissingMovement {
        /// The envelope's ID.
        transaction_id: i64,
        /// The envelope's declared kind.
        kind: MovementKind,
    },

    /// A stored row could not be mapped back into the domain.
    #[error("Corrupt ledger row: {0}")]
    CorruptRow(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::MissingMovement { .. } => "MISSING_MOVEMENT",
            Self::CorruptRow(_) => "CORRUPT_ROW",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 422 Unprocessable Entity - validation errors
            Self::InvalidAmount(_) | Self::InsufficientFunds { .. } | Self::SelfTransfer => 422,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 500 Internal Server Error
            Self::MissingMovement { .. } | Self::CorruptRow(_) => 500,
        }
    }

    /// Returns true if the stored ledger data violates a structural invariant.
    #[must_use]
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::MissingMovement { .. } | Self::CorruptRow(_))
    }
}
