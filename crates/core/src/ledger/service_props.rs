//! Property-based tests for LedgerService.
//!
//! - Balance invariant: stored balance equals opening balance plus the
//!   movement totals, and never goes negative.
//! - Transfer conservation: a transfer never creates or destroys money.
//! - Lock ordering: changes are always emitted in ascending account order.

use proptest::prelude::*;
use rust_decimal::Decimal;
use wallet_shared::types::AccountId;

use super::balance::BalanceSummary;
use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{AccountSnapshot, Movement};

/// Strategy to generate positive decimal amounts (0.01 to 1,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate non-negative balances (0.00 to 10,000.00).
fn balance() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// One requested operation over a fixed set of accounts.
#[derive(Debug, Clone)]
enum Op {
    Deposit(usize, Decimal),
    Withdraw(usize, Decimal),
    Transfer(usize, usize, Decimal),
}

const ACCOUNTS: usize = 3;

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, positive_amount()).prop_map(|(a, m)| Op::Deposit(a, m)),
        (0..ACCOUNTS, positive_amount()).prop_map(|(a, m)| Op::Withdraw(a, m)),
        (0..ACCOUNTS, 0..ACCOUNTS, positive_amount()).prop_map(|(a, b, m)| Op::Transfer(a, b, m)),
    ]
}

/// In-memory stand-in for the storage layer: applies plans to a balance table.
struct Book {
    ids: Vec<AccountId>,
    balances: Vec<Decimal>,
    posted: Vec<(AccountId, Movement)>,
}

impl Book {
    fn new(openings: &[Decimal]) -> Self {
        Self {
            ids: (0..openings.len()).map(|_| AccountId::new()).collect(),
            balances: openings.to_vec(),
            posted: Vec::new(),
        }
    }

    fn snapshot(&self, index: usize) -> AccountSnapshot {
        AccountSnapshot::new(self.ids[index], self.balances[index])
    }

    fn index_of(&self, id: AccountId) -> usize {
        self.ids.iter().position(|x| *x == id).unwrap()
    }

    fn apply(&mut self, op: &Op) -> Result<(), LedgerError> {
        let plan = match *op {
            Op::Deposit(a, amount) => LedgerService::plan_deposit(&self.snapshot(a), amount)?,
            Op::Withdraw(a, amount) => LedgerService::plan_withdrawal(&self.snapshot(a), amount)?,
            Op::Transfer(a, b, amount) => {
                LedgerService::plan_transfer(&self.snapshot(a), &self.snapshot(b), amount)?
            }
        };
        for change in &plan.changes {
            let idx = self.index_of(change.account_id);
            assert_eq!(self.balances[idx], change.previous);
            self.balances[idx] = change.current;
        }
        self.posted.push((plan.owner, plan.movement));
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* sequence of operations, each account's balance equals its
    /// opening balance plus deposits, minus withdrawals, minus transfers
    /// sent, plus transfers received, and is never negative.
    #[test]
    fn prop_balance_invariant(
        openings in proptest::collection::vec(balance(), ACCOUNTS),
        ops in proptest::collection::vec(op_strategy(), 1..40),
    ) {
        let mut book = Book::new(&openings);

        for op in &ops {
            // Rejected operations must leave the book untouched.
            let before = book.balances.clone();
            if book.apply(op).is_err() {
                prop_assert_eq!(&book.balances, &before);
            }
            prop_assert!(book.balances.iter().all(|b| *b >= Decimal::ZERO));
        }

        for (idx, id) in book.ids.iter().enumerate() {
            let summary = BalanceSummary::for_account(*id, &book.posted);
            prop_assert_eq!(book.balances[idx], summary.expected_balance(openings[idx]));
        }
    }

    /// *For any* successful transfer, the sum of both balances is unchanged.
    #[test]
    fn prop_transfer_conserves_money(
        sender_balance in balance(),
        recipient_balance in balance(),
        amount in positive_amount(),
    ) {
        let sender = AccountSnapshot::new(AccountId::new(), sender_balance);
        let recipient = AccountSnapshot::new(AccountId::new(), recipient_balance);

        match LedgerService::plan_transfer(&sender, &recipient, amount) {
            Ok(plan) => {
                let after: Decimal = plan.changes.iter().map(|c| c.current).sum();
                prop_assert_eq!(after, sender_balance + recipient_balance);
                prop_assert_eq!(plan.movement.stored_amount(), -amount);
            }
            Err(LedgerError::InsufficientFunds { .. }) => {
                prop_assert!(amount > sender_balance);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }

    /// *For any* withdrawal, success is exactly the case `amount <= balance`.
    #[test]
    fn prop_withdrawal_succeeds_iff_covered(
        opening in balance(),
        amount in positive_amount(),
    ) {
        let account = AccountSnapshot::new(AccountId::new(), opening);
        let result = LedgerService::plan_withdrawal(&account, amount);
        prop_assert_eq!(result.is_ok(), amount <= opening);
    }

    /// *For any* transfer, balance changes follow ascending account order.
    #[test]
    fn prop_transfer_lock_order(amount in positive_amount()) {
        let a = AccountSnapshot::new(AccountId::new(), amount);
        let b = AccountSnapshot::new(AccountId::new(), amount);

        let plan = LedgerService::plan_transfer(&a, &b, amount).unwrap();
        prop_assert!(plan.changes[0].account_id < plan.changes[1].account_id);
    }
}
