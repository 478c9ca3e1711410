//! `SeaORM` active enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use wallet_core::ledger::MovementKind;

/// Kind tag of a transaction envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionKind {
    /// Deposit envelope.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Withdrawal envelope.
    #[sea_orm(string_value = "withdraw")]
    Withdraw,
    /// Transfer envelope.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl From<MovementKind> for TransactionKind {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::Deposit => Self::Deposit,
            MovementKind::Withdraw => Self::Withdraw,
            MovementKind::Transfer => Self::Transfer,
        }
    }
}

impl From<TransactionKind> for MovementKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Deposit => Self::Deposit,
            TransactionKind::Withdraw => Self::Withdraw,
            TransactionKind::Transfer => Self::Transfer,
        }
    }
}
