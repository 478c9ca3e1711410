//! Ledger repository: atomic deposit, withdrawal, and transfer execution.
//!
//! Every operation runs in one database transaction:
//! 1. Lock the affected account rows (ascending ID order)
//! 2. Plan the movement with `LedgerService`
//! 3. Insert the envelope and its payload
//! 4. Write the new balances
//! 5. Commit
//!
//! Any error drops the transaction, which rolls it back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use wallet_core::ledger::{
    AccountSnapshot, LedgerError, LedgerPlan, LedgerService, Movement, MovementKind,
};
use wallet_core::limits::{DatedAmount, LimitKind, LimitPolicy};
use wallet_shared::types::AccountId;

use super::account::money;
use crate::entities::{accounts, deposits, transactions, transfers, withdrawals};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerRepoError {
    /// Business rule or integrity failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error; the operation was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of a committed ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReceipt {
    /// ID of the new transaction envelope.
    pub transaction_id: i64,
    /// Envelope kind.
    pub kind: MovementKind,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
    /// Owner's balance after the operation.
    pub balance: Decimal,
}

/// Ledger repository; the only writer of account balances.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Deposits `amount` into `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` for non-positive amounts,
    /// `LedgerError::AccountNotFound` for unknown accounts, or the database
    /// error that aborted the transaction.
    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<LedgerReceipt, LedgerRepoError> {
        LedgerService::validate_amount(amount)?;

        let txn = self.db.begin().await?;
        let account = lock_account(&txn, account_id).await?;
        let plan = LedgerService::plan_deposit(&account, amount)?;
        let receipt = apply_plan(&txn, &plan).await?;
        txn.commit().await?;

        debug!(
            account_id = %account_id,
            transaction_id = receipt.transaction_id,
            amount = %amount,
            "Deposit committed"
        );
        Ok(receipt)
    }

    /// Withdraws `amount` from `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientFunds` if the balance cannot cover
    /// the amount, plus the errors listed on [`Self::deposit`].
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<LedgerReceipt, LedgerRepoError> {
        LedgerService::validate_amount(amount)?;

        let txn = self.db.begin().await?;
        let account = lock_account(&txn, account_id).await?;
        let plan = LedgerService::plan_withdrawal(&account, amount)?;
        let receipt = apply_plan(&txn, &plan).await?;
        txn.commit().await?;

        debug!(
            account_id = %account_id,
            transaction_id = receipt.transaction_id,
            amount = %amount,
            "Withdrawal committed"
        );
        Ok(receipt)
    }

    /// Transfers `amount` from `sender_id` to `recipient_id`.
    ///
    /// Only one envelope is written, owned by the sender.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::SelfTransfer` if both IDs are equal, plus the
    /// errors listed on [`Self::withdraw`].
    pub async fn transfer(
        &self,
        sender_id: AccountId,
        recipient_id: AccountId,
        amount: Decimal,
    ) -> Result<LedgerReceipt, LedgerRepoError> {
        LedgerService::validate_amount(amount)?;
        if sender_id == recipient_id {
            return Err(LedgerError::SelfTransfer.into());
        }

        let txn = self.db.begin().await?;
        let [first, second] = LedgerService::lock_order(sender_id, recipient_id);
        let first = lock_account(&txn, first).await?;
        let second = lock_account(&txn, second).await?;
        let (sender, recipient) = if first.id == sender_id {
            (first, second)
        } else {
            (second, first)
        };

        let plan = LedgerService::plan_transfer(&sender, &recipient, amount)?;
        let receipt = apply_plan(&txn, &plan).await?;
        txn.commit().await?;

        debug!(
            sender_id = %sender_id,
            recipient_id = %recipient_id,
            transaction_id = receipt.transaction_id,
            amount = %amount,
            "Transfer committed"
        );
        Ok(receipt)
    }

    /// Returns the account's recorded deposit or withdrawal amounts
    /// committed at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn movements_since(
        &self,
        account_id: AccountId,
        kind: LimitKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<DatedAmount>, DbErr> {
        let owner = account_id.into_inner();
        let rows: Vec<(Decimal, Option<transactions::Model>)> = match kind {
            LimitKind::Deposit => deposits::Entity::find()
                .find_also_related(transactions::Entity)
                .filter(transactions::Column::AccountId.eq(owner))
                .filter(transactions::Column::CreatedAt.gte(since))
                .order_by_asc(transactions::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(payload, header)| (payload.amount, header))
                .collect(),
            LimitKind::Withdraw => withdrawals::Entity::find()
                .find_also_related(transactions::Entity)
                .filter(transactions::Column::AccountId.eq(owner))
                .filter(transactions::Column::CreatedAt.gte(since))
                .order_by_asc(transactions::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(payload, header)| (payload.amount, header))
                .collect(),
        };

        Ok(rows
            .into_iter()
            .filter_map(|(amount, header)| {
                header.map(|h| DatedAmount::new(h.created_at, money(amount)))
            })
            .collect())
    }

    /// Evaluates the daily limit for a prospective deposit or withdrawal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exceeds_daily_limit(
        &self,
        policy: &LimitPolicy,
        account_id: AccountId,
        kind: LimitKind,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let movements = self
            .movements_since(account_id, kind, policy.day_start(now))
            .await?;
        Ok(policy.exceeds_daily_limit(kind, amount, &movements, now))
    }
}

/// Reads an account row under an exclusive row lock.
async fn lock_account(
    txn: &DatabaseTransaction,
    account_id: AccountId,
) -> Result<AccountSnapshot, LedgerRepoError> {
    let account = accounts::Entity::find_by_id(account_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::AccountNotFound(account_id))?;

    Ok(AccountSnapshot::new(account_id, money(account.balance)))
}

/// Writes the envelope, its payload, and every balance change of `plan`.
async fn apply_plan(
    txn: &DatabaseTransaction,
    plan: &LedgerPlan,
) -> Result<LedgerReceipt, LedgerRepoError> {
    let created_at = Utc::now();
    let header = transactions::ActiveModel {
        account_id: Set(plan.owner.into_inner()),
        kind: Set(plan.movement.kind().into()),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    match plan.movement {
        Movement::Deposit { .. } => {
            deposits::ActiveModel {
                transaction_id: Set(header.id),
                amount: Set(plan.movement.stored_amount()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
        Movement::Withdrawal { .. } => {
            withdrawals::ActiveModel {
                transaction_id: Set(header.id),
                amount: Set(plan.movement.stored_amount()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
        Movement::Transfer { recipient, .. } => {
            transfers::ActiveModel {
                transaction_id: Set(header.id),
                recipient_account_id: Set(recipient.into_inner()),
                amount: Set(plan.movement.stored_amount()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
    }

    for change in &plan.changes {
        accounts::ActiveModel {
            id: Set(change.account_id.into_inner()),
            balance: Set(change.current),
            ..Default::default()
        }
        .update(txn)
        .await?;
    }

    let balance = plan
        .balance_after(plan.owner)
        .ok_or_else(|| LedgerError::CorruptRow(format!("plan has no change for {}", plan.owner)))?;

    Ok(LedgerReceipt {
        transaction_id: header.id,
        kind: plan.movement.kind(),
        created_at,
        balance,
    })
}
