//! Merges the four movement sources into one ordered history.

use crate::ledger::{LedgerError, MovementKind};

use super::types::{HistoryItem, HistoryKind, HistoryRecords};

/// Builds an account's normalized, chronologically ordered history.
pub struct HistoryReconstructor;

impl HistoryReconstructor {
    /// Reconstructs the history from raw storage rows.
    ///
    /// Every owned envelope must have a payload of its declared kind.
    /// Entries are ordered by `created_at`, ties broken by envelope ID.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::MissingMovement` if an envelope has no
    /// matching payload.
    pub fn reconstruct(mut records: HistoryRecords) -> Result<Vec<HistoryItem>, LedgerError> {
        let mut items = Vec::with_capacity(records.headers.len() + records.received.len());

        for header in &records.headers {
            let missing = || LedgerError::MissingMovement {
                transaction_id: header.id,
                kind: header.kind,
            };

            let item = match header.kind {
                MovementKind::Deposit => {
                    let amount = records.deposits.remove(&header.id).ok_or_else(missing)?;
                    HistoryItem {
                        id: header.id,
                        kind: HistoryKind::Deposit,
                        created_at: header.created_at,
                        amount: amount.abs(),
                        recipient: None,
                        sender: None,
                    }
                }
                MovementKind::Withdraw => {
                    let amount = records.withdrawals.remove(&header.id).ok_or_else(missing)?;
                    HistoryItem {
                        id: header.id,
                        kind: HistoryKind::Withdraw,
                        created_at: header.created_at,
                        amount: amount.abs(),
                        recipient: None,
                        sender: None,
                    }
                }
                MovementKind::Transfer => {
                    let transfer = records.transfers.remove(&header.id).ok_or_else(missing)?;
                    HistoryItem {
                        id: header.id,
                        kind: HistoryKind::Transfer,
                        created_at: header.created_at,
                        amount: transfer.amount.abs(),
                        recipient: Some(transfer.recipient_name),
                        sender: None,
                    }
                }
            };
            items.push(item);
        }

        items.extend(records.received.into_iter().map(|r| HistoryItem {
            id: r.transaction_id,
            kind: HistoryKind::TransferReceived,
            created_at: r.created_at,
            amount: r.amount.abs(),
            recipient: None,
            sender: Some(r.sender_name),
        }));

        items.sort_by_key(|item| (item.created_at, item.id));
        Ok(items)
    }
}
