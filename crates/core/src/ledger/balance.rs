//! Balance derivation from recorded movements.
//!
//! The stored balance must always equal the opening balance plus
//! deposits, minus withdrawals, minus outgoing transfers, plus incoming
//! transfers.

use rust_decimal::Decimal;
use serde::Serialize;
use wallet_shared::types::AccountId;

use super::types::Movement;
use crate::history::{HistoryItem, HistoryKind};

/// Movement totals for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// Sum of deposits.
    pub deposits: Decimal,
    /// Sum of withdrawals.
    pub withdrawals: Decimal,
    /// Sum of transfers sent.
    pub transfers_out: Decimal,
    /// Sum of transfers received.
    pub transfers_in: Decimal,
}

impl BalanceSummary {
    /// Totals the movements touching `account`.
    ///
    /// Each element pairs the envelope owner with its payload.
    #[must_use]
    pub fn for_account<'a, I>(account: AccountId, movements: I) -> Self
    where
        I: IntoIterator<Item = &'a (AccountId, Movement)>,
    {
        let mut summary = Self::default();
        for (owner, movement) in movements {
            let value = movement.amount().value();
            match movement {
                Movement::Deposit { .. } if *owner == account => summary.deposits += value,
                Movement::Withdrawal { .. } if *owner == account => summary.withdrawals += value,
                Movement::Transfer { recipient, .. } => {
                    if *owner == account {
                        summary.transfers_out += value;
                    }
                    if *recipient == account {
                        summary.transfers_in += value;
                    }
                }
                _ => {}
            }
        }
        summary
    }

    /// Totals a reconstructed history.
    #[must_use]
    pub fn from_history(items: &[HistoryItem]) -> Self {
        let mut summary = Self::default();
        for item in items {
            match item.kind {
                HistoryKind::Deposit => summary.deposits += item.amount,
                HistoryKind::Withdraw => summary.withdrawals += item.amount,
                HistoryKind::Transfer => summary.transfers_out += item.amount,
                HistoryKind::TransferReceived => summary.transfers_in += item.amount,
            }
        }
        summary
    }

    /// Net effect on the balance.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.deposits - self.withdrawals - self.transfers_out + self.transfers_in
    }

    /// Balance expected after applying the totals to `opening`.
    #[must_use]
    pub fn expected_balance(&self, opening: Decimal) -> Decimal {
        opening + self.net()
    }
}
