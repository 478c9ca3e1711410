//! Ledger service for movement validation and planning.
//!
//! This module provides the core business logic that runs between reading
//! the locked account rows and writing the new state. It never touches
//! storage; the caller executes the returned plan atomically.

use rust_decimal::Decimal;
use wallet_shared::types::{AccountId, Amount};

use super::error::LedgerError;
use super::types::{AccountSnapshot, BalanceChange, LedgerPlan, Movement};

/// Ledger service for movement validation and planning.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates a raw decimal as a movement amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` for zero, negative, or
    /// sub-cent values.
    pub fn validate_amount(amount: Decimal) -> Result<Amount, LedgerError> {
        Amount::new(amount).map_err(|e| LedgerError::InvalidAmount(e.to_string()))
    }

    /// Returns the order in which two accounts must be locked.
    ///
    /// Every operation touching two accounts acquires row locks in ascending
    /// ID order, so two transfers crossing in opposite directions never
    /// deadlock.
    #[must_use]
    pub fn lock_order(a: AccountId, b: AccountId) -> [AccountId; 2] {
        if a <= b { [a, b] } else { [b, a] }
    }

    /// Plans a deposit into `account`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if the amount is not positive.
    pub fn plan_deposit(
        account: &AccountSnapshot,
        amount: Decimal,
    ) -> Result<LedgerPlan, LedgerError> {
        let amount = Self::validate_amount(amount)?;

        Ok(LedgerPlan {
            owner: account.id,
            movement: Movement::Deposit { amount },
            changes: vec![BalanceChange {
                account_id: account.id,
                previous: account.balance,
                current: account.balance + amount.value(),
            }],
        })
    }

    /// Plans a withdrawal from `account`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if the amount is not positive.
    /// Returns `LedgerError::InsufficientFunds` if the balance would go
    /// negative.
    pub fn plan_withdrawal(
        account: &AccountSnapshot,
        amount: Decimal,
    ) -> Result<LedgerPlan, LedgerError> {
        let amount = Self::validate_amount(amount)?;
        let current = Self::debit(account, amount)?;

        Ok(LedgerPlan {
            owner: account.id,
            movement: Movement::Withdrawal { amount },
            changes: vec![BalanceChange {
                account_id: account.id,
                previous: account.balance,
                current,
            }],
        })
    }

    /// Plans a transfer from `sender` to `recipient`.
    ///
    /// Balance changes are returned in lock order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if the amount is not positive.
    /// Returns `LedgerError::SelfTransfer` if both snapshots are the same
    /// account.
    /// Returns `LedgerError::InsufficientFunds` if the sender cannot cover
    /// the amount.
    pub fn plan_transfer(
        sender: &AccountSnapshot,
        recipient: &AccountSnapshot,
        amount: Decimal,
    ) -> Result<LedgerPlan, LedgerError> {
        let amount = Self::validate_amount(amount)?;
        if sender.id == recipient.id {
            return Err(LedgerError::SelfTransfer);
        }

        let sender_change = BalanceChange {
            account_id: sender.id,
            previous: sender.balance,
            current: Self::debit(sender, amount)?,
        };
        let recipient_change = BalanceChange {
            account_id: recipient.id,
            previous: recipient.balance,
            current: recipient.balance + amount.value(),
        };

        let changes = if sender.id < recipient.id {
            vec![sender_change, recipient_change]
        } else {
            vec![recipient_change, sender_change]
        };

        Ok(LedgerPlan {
            owner: sender.id,
            movement: Movement::Transfer {
                amount,
                recipient: recipient.id,
            },
            changes,
        })
    }

    fn debit(account: &AccountSnapshot, amount: Amount) -> Result<Decimal, LedgerError> {
        let current = account.balance - amount.value();
        if current < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds {
                account_id: account.id,
                balance: account.balance,
                requested: amount.value(),
            });
        }
        Ok(current)
    }
}
