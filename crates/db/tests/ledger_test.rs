//! Integration tests for the ledger repository.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use wallet_core::ledger::{BalanceSummary, LedgerError, MovementKind};
use wallet_db::entities::{deposits, transactions, transfers};
use wallet_db::{HistoryRepository, LedgerRepoError, LedgerRepository};
use wallet_shared::types::AccountId;

#[tokio::test]
async fn test_deposit_records_envelope_and_payload() {
    let db = common::setup().await;
    let account = common::create_account(&db, "Alice").await;
    let ledger = LedgerRepository::new(db.clone());

    let receipt = ledger.deposit(account, dec!(25.00)).await.unwrap();

    assert_eq!(receipt.kind, MovementKind::Deposit);
    assert_eq!(receipt.balance, dec!(25.00));
    assert_eq!(common::balance_of(&db, account).await, dec!(25.00));

    let payload = deposits::Entity::find().all(&db).await.unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0].transaction_id, receipt.transaction_id);
}

#[tokio::test]
async fn test_withdraw_decrements_balance() {
    let db = common::setup().await;
    let account = common::create_funded_account(&db, "Alice", dec!(40)).await;
    let ledger = LedgerRepository::new(db.clone());

    let receipt = ledger.withdraw(account, dec!(15.50)).await.unwrap();

    assert_eq!(receipt.kind, MovementKind::Withdraw);
    assert_eq!(receipt.balance, dec!(24.50));
    assert_eq!(common::balance_of(&db, account).await, dec!(24.50));
}

#[tokio::test]
async fn test_transfer_symmetry() {
    let db = common::setup().await;
    let alice = common::create_funded_account(&db, "Alice", dec!(80)).await;
    let bob = common::create_funded_account(&db, "Bob", dec!(5)).await;
    let ledger = LedgerRepository::new(db.clone());

    let receipt = ledger.transfer(alice, bob, dec!(30)).await.unwrap();

    assert_eq!(receipt.balance, dec!(50));
    assert_eq!(common::balance_of(&db, alice).await, dec!(50));
    assert_eq!(common::balance_of(&db, bob).await, dec!(35));

    // One envelope, owned by the sender, with a negative payload.
    let envelopes = transactions::Entity::find().all(&db).await.unwrap();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].account_id, alice.into_inner());
    let payload = transfers::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(payload.amount, dec!(-30));
    assert_eq!(payload.recipient_account_id, bob.into_inner());

    let history = HistoryRepository::new(db.clone()).history(bob).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec!(30));
    assert_eq!(history[0].sender.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn test_insufficient_funds_leaves_balance_unchanged() {
    let db = common::setup().await;
    let alice = common::create_funded_account(&db, "Alice", dec!(10)).await;
    let bob = common::create_account(&db, "Bob").await;
    let ledger = LedgerRepository::new(db.clone());

    let err = ledger.withdraw(alice, dec!(10.01)).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerRepoError::Ledger(LedgerError::InsufficientFunds { .. })
    ));

    let err = ledger.transfer(alice, bob, dec!(11)).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerRepoError::Ledger(LedgerError::InsufficientFunds { .. })
    ));

    assert_eq!(common::balance_of(&db, alice).await, dec!(10));
    assert_eq!(common::balance_of(&db, bob).await, Decimal::ZERO);
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_amounts_rejected() {
    let db = common::setup().await;
    let account = common::create_funded_account(&db, "Alice", dec!(10)).await;
    let ledger = LedgerRepository::new(db.clone());

    for amount in [Decimal::ZERO, dec!(-1), dec!(0.005)] {
        assert!(matches!(
            ledger.deposit(account, amount).await,
            Err(LedgerRepoError::Ledger(LedgerError::InvalidAmount(_)))
        ));
        assert!(matches!(
            ledger.withdraw(account, amount).await,
            Err(LedgerRepoError::Ledger(LedgerError::InvalidAmount(_)))
        ));
    }
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_self_transfer_rejected() {
    let db = common::setup().await;
    let alice = common::create_funded_account(&db, "Alice", dec!(10)).await;
    let ledger = LedgerRepository::new(db.clone());

    assert!(matches!(
        ledger.transfer(alice, alice, dec!(1)).await,
        Err(LedgerRepoError::Ledger(LedgerError::SelfTransfer))
    ));
    assert_eq!(common::balance_of(&db, alice).await, dec!(10));
}

#[tokio::test]
async fn test_unknown_account() {
    let db = common::setup().await;
    let alice = common::create_funded_account(&db, "Alice", dec!(10)).await;
    let ghost = AccountId::new();
    let ledger = LedgerRepository::new(db.clone());

    assert!(matches!(
        ledger.deposit(ghost, dec!(1)).await,
        Err(LedgerRepoError::Ledger(LedgerError::AccountNotFound(id))) if id == ghost
    ));
    assert!(matches!(
        ledger.transfer(alice, ghost, dec!(1)).await,
        Err(LedgerRepoError::Ledger(LedgerError::AccountNotFound(id))) if id == ghost
    ));
    assert_eq!(common::balance_of(&db, alice).await, dec!(10));
}

#[tokio::test]
async fn test_failed_payload_write_rolls_back_deposit() {
    let db = common::setup().await;
    let account = common::create_funded_account(&db, "Alice", dec!(10)).await;
    let ledger = LedgerRepository::new(db.clone());

    db.execute_unprepared("DROP TABLE deposits").await.unwrap();

    let err = ledger.deposit(account, dec!(5)).await.unwrap_err();
    assert!(matches!(err, LedgerRepoError::Database(_)));

    assert_eq!(common::balance_of(&db, account).await, dec!(10));
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_payload_write_rolls_back_withdraw() {
    let db = common::setup().await;
    let account = common::create_funded_account(&db, "Alice", dec!(40)).await;
    let ledger = LedgerRepository::new(db.clone());

    db.execute_unprepared("DROP TABLE withdrawals").await.unwrap();

    let err = ledger.withdraw(account, dec!(15)).await.unwrap_err();
    assert!(matches!(err, LedgerRepoError::Database(_)));

    assert_eq!(common::balance_of(&db, account).await, dec!(40));
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_payload_write_rolls_back_transfer() {
    let db = common::setup().await;
    let alice = common::create_funded_account(&db, "Alice", dec!(80)).await;
    let bob = common::create_funded_account(&db, "Bob", dec!(5)).await;
    let ledger = LedgerRepository::new(db.clone());

    db.execute_unprepared("DROP TABLE transfers").await.unwrap();

    let err = ledger.transfer(alice, bob, dec!(30)).await.unwrap_err();
    assert!(matches!(err, LedgerRepoError::Database(_)));

    assert_eq!(common::balance_of(&db, alice).await, dec!(80));
    assert_eq!(common::balance_of(&db, bob).await, dec!(5));
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_balance_matches_history_totals() {
    let db = common::setup().await;
    let alice = common::create_account(&db, "Alice").await;
    let bob = common::create_account(&db, "Bob").await;
    let ledger = LedgerRepository::new(db.clone());
    let history = HistoryRepository::new(db.clone());

    ledger.deposit(alice, dec!(100)).await.unwrap();
    ledger.deposit(bob, dec!(20)).await.unwrap();
    ledger.transfer(alice, bob, dec!(35.25)).await.unwrap();
    ledger.withdraw(bob, dec!(12.10)).await.unwrap();
    ledger.transfer(bob, alice, dec!(3.15)).await.unwrap();
    ledger.withdraw(alice, dec!(0.01)).await.unwrap();

    for account in [alice, bob] {
        let items = history.history(account).await.unwrap();
        let summary = BalanceSummary::from_history(&items);
        assert_eq!(
            common::balance_of(&db, account).await,
            summary.expected_balance(Decimal::ZERO)
        );
    }
    assert_eq!(common::balance_of(&db, alice).await, dec!(67.89));
    assert_eq!(common::balance_of(&db, bob).await, dec!(40.00));
}
