//! Ledger domain types for money movements.
//!
//! A movement is the amount-bearing payload attached to exactly one
//! transaction envelope. The envelope's kind tag always matches the
//! movement variant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wallet_shared::types::{AccountId, Amount};

/// Kind tag stored on every transaction envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Money added to the owner's balance.
    Deposit,
    /// Money taken out of the owner's balance.
    Withdraw,
    /// Money moved from the owner to another account.
    Transfer,
}

impl MovementKind {
    /// Returns the storage tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            "transfer" => Ok(Self::Transfer),
            other => Err(format!("unknown movement kind: {other}")),
        }
    }
}

/// Amount-bearing payload of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Deposit into the owner's account.
    Deposit {
        /// Deposited amount.
        amount: Amount,
    },
    /// Withdrawal from the owner's account.
    Withdrawal {
        /// Withdrawn amount.
        amount: Amount,
    },
    /// Transfer from the owner to `recipient`.
    Transfer {
        /// Transferred amount (positive; stored negated).
        amount: Amount,
        /// Receiving account.
        recipient: AccountId,
    },
}

impl Movement {
    /// Returns the envelope kind matching this payload.
    #[must_use]
    pub const fn kind(&self) -> MovementKind {
        match self {
            Self::Deposit { .. } => MovementKind::Deposit,
            Self::Withdrawal { .. } => MovementKind::Withdraw,
            Self::Transfer { .. } => MovementKind::Transfer,
        }
    }

    /// Returns the positive magnitude of the movement.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        match self {
            Self::Deposit { amount }
            | Self::Withdrawal { amount }
            | Self::Transfer { amount, .. } => *amount,
        }
    }

    /// Returns the amount as persisted in the payload row.
    ///
    /// Transfers are recorded from the sender's point of view, so the
    /// stored quantity is negative.
    #[must_use]
    pub fn stored_amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount } | Self::Withdrawal { amount } => amount.value(),
            Self::Transfer { amount, .. } => amount.negated(),
        }
    }
}

/// Current persisted state of an account, as read under lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// The account ID.
    pub id: AccountId,
    /// Balance at the time of the read.
    pub balance: Decimal,
}

impl AccountSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(id: AccountId, balance: Decimal) -> Self {
        Self { id, balance }
    }
}

/// Balance transition for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    /// The account ID.
    pub account_id: AccountId,
    /// Balance before the movement.
    pub previous: Decimal,
    /// Balance after the movement.
    pub current: Decimal,
}

/// A validated movement together with the balance updates it implies.
///
/// Produced by [`LedgerService`](super::LedgerService) and applied by the
/// storage layer inside a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPlan {
    /// Account owning the transaction envelope.
    pub owner: AccountId,
    /// Payload to persist.
    pub movement: Movement,
    /// Balance updates, in lock order.
    pub changes: Vec<BalanceChange>,
}

impl LedgerPlan {
    /// Returns the new balance for `account`, if the plan touches it.
    #[must_use]
    pub fn balance_after(&self, account: AccountId) -> Option<Decimal> {
        self.changes
            .iter()
            .find(|c| c.account_id == account)
            .map(|c| c.current)
    }
}
