//! History repository: fetches the four movement sources for an account.
//!
//! Reads are not wrapped in a transaction; a history that is slightly
//! behind a concurrent write is acceptable.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;
use wallet_core::history::{
    HistoryItem, HistoryReconstructor, HistoryRecords, ReceivedTransfer, SentTransfer,
    TransactionHeader,
};
use wallet_core::ledger::LedgerError;
use wallet_shared::types::AccountId;

use super::account::money;
use super::ledger::LedgerRepoError;
use crate::entities::{accounts, deposits, transactions, transfers, withdrawals};

/// History repository for read-only movement queries.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    db: DatabaseConnection,
}

impl HistoryRepository {
    /// Creates a new history repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the account's normalized history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::MissingMovement` if an envelope has no payload
    /// of its kind, `LedgerError::CorruptRow` if a counterparty account is
    /// missing, or the database error.
    pub async fn history(&self, account_id: AccountId) -> Result<Vec<HistoryItem>, LedgerRepoError> {
        let records = self.fetch_records(account_id).await?;
        Ok(HistoryReconstructor::reconstruct(records)?)
    }

    /// Loads the raw rows for [`Self::history`].
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CorruptRow` if a referenced row is missing, or
    /// the database error.
    pub async fn fetch_records(
        &self,
        account_id: AccountId,
    ) -> Result<HistoryRecords, LedgerRepoError> {
        let owner = account_id.into_inner();

        let headers: Vec<TransactionHeader> = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(owner))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| TransactionHeader {
                id: t.id,
                kind: t.kind.into(),
                created_at: t.created_at,
            })
            .collect();

        let deposits: HashMap<i64, _> = deposits::Entity::find()
            .inner_join(transactions::Entity)
            .filter(transactions::Column::AccountId.eq(owner))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|d| (d.transaction_id, money(d.amount)))
            .collect();

        let withdrawals: HashMap<i64, _> = withdrawals::Entity::find()
            .inner_join(transactions::Entity)
            .filter(transactions::Column::AccountId.eq(owner))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|w| (w.transaction_id, money(w.amount)))
            .collect();

        let sent = transfers::Entity::find()
            .inner_join(transactions::Entity)
            .filter(transactions::Column::AccountId.eq(owner))
            .all(&self.db)
            .await?;

        let received = transfers::Entity::find()
            .find_also_related(transactions::Entity)
            .filter(transfers::Column::RecipientAccountId.eq(owner))
            .all(&self.db)
            .await?;

        let mut counterparties: HashSet<Uuid> =
            sent.iter().map(|t| t.recipient_account_id).collect();
        counterparties.extend(
            received
                .iter()
                .filter_map(|(_, header)| header.as_ref().map(|h| h.account_id)),
        );
        let names = self.names(counterparties).await?;
        let name_of = |id: Uuid| {
            names
                .get(&id)
                .cloned()
                .ok_or_else(|| LedgerError::CorruptRow(format!("counterparty account {id} missing")))
        };

        let mut transfers = HashMap::with_capacity(sent.len());
        for t in sent {
            transfers.insert(
                t.transaction_id,
                SentTransfer {
                    amount: money(t.amount),
                    recipient_name: name_of(t.recipient_account_id)?,
                },
            );
        }

        let mut incoming = Vec::with_capacity(received.len());
        for (t, header) in received {
            let header = header.ok_or_else(|| {
                LedgerError::CorruptRow(format!("transfer {} has no envelope", t.id))
            })?;
            incoming.push(ReceivedTransfer {
                transaction_id: header.id,
                created_at: header.created_at,
                amount: money(t.amount),
                sender_name: name_of(header.account_id)?,
            });
        }

        Ok(HistoryRecords {
            headers,
            deposits,
            withdrawals,
            transfers,
            received: incoming,
        })
    }

    async fn names(&self, ids: HashSet<Uuid>) -> Result<HashMap<Uuid, String>, LedgerRepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|a| (a.id, a.name)).collect())
    }
}
