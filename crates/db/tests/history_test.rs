//! Integration tests for history reconstruction against storage.

mod common;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use wallet_core::history::HistoryKind;
use wallet_core::ledger::{LedgerError, MovementKind};
use wallet_db::entities::{TransactionKind, transactions};
use wallet_db::{HistoryRepository, LedgerRepoError, LedgerRepository};

#[tokio::test]
async fn test_history_ordering_and_normalization() {
    let db = common::setup().await;
    let alice = common::create_account(&db, "Alice").await;
    let bob = common::create_account(&db, "Bob").await;
    let ledger = LedgerRepository::new(db.clone());

    ledger.deposit(alice, dec!(25)).await.unwrap();
    ledger.withdraw(alice, dec!(10)).await.unwrap();
    ledger.transfer(alice, bob, dec!(5)).await.unwrap();

    let items = HistoryRepository::new(db.clone())
        .history(alice)
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(
        items.iter().map(|i| i.kind).collect::<Vec<_>>(),
        vec![HistoryKind::Deposit, HistoryKind::Withdraw, HistoryKind::Transfer]
    );
    assert_eq!(
        items.iter().map(|i| i.amount).collect::<Vec<_>>(),
        vec![dec!(25), dec!(10), dec!(5)]
    );
    assert!(items.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let transfer = &items[2];
    assert_eq!(transfer.recipient.as_deref(), Some("Bob"));
    assert_eq!(transfer.sender, None);
    assert!(items[..2].iter().all(|i| i.recipient.is_none() && i.sender.is_none()));
}

#[tokio::test]
async fn test_received_transfers_interleave() {
    let db = common::setup().await;
    let alice = common::create_account(&db, "Alice").await;
    let bob = common::create_account(&db, "Bob").await;
    let ledger = LedgerRepository::new(db.clone());

    ledger.deposit(alice, dec!(50)).await.unwrap();
    ledger.deposit(bob, dec!(50)).await.unwrap();
    ledger.transfer(bob, alice, dec!(7.50)).await.unwrap();
    ledger.withdraw(alice, dec!(1)).await.unwrap();

    let items = HistoryRepository::new(db.clone())
        .history(alice)
        .await
        .unwrap();

    assert_eq!(
        items.iter().map(|i| i.kind).collect::<Vec<_>>(),
        vec![
            HistoryKind::Deposit,
            HistoryKind::TransferReceived,
            HistoryKind::Withdraw
        ]
    );
    assert_eq!(items[1].amount, dec!(7.50));
    assert_eq!(items[1].sender.as_deref(), Some("Bob"));
    assert_eq!(items[1].recipient, None);
}

#[tokio::test]
async fn test_history_reads_are_idempotent() {
    let db = common::setup().await;
    let alice = common::create_account(&db, "Alice").await;
    let bob = common::create_account(&db, "Bob").await;
    let ledger = LedgerRepository::new(db.clone());
    let history = HistoryRepository::new(db.clone());

    ledger.deposit(alice, dec!(30)).await.unwrap();
    ledger.transfer(alice, bob, dec!(12)).await.unwrap();

    let first = history.history(alice).await.unwrap();
    let second = history.history(alice).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_history() {
    let db = common::setup().await;
    let alice = common::create_account(&db, "Alice").await;

    let items = HistoryRepository::new(db.clone())
        .history(alice)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_envelope_without_payload_is_integrity_violation() {
    let db = common::setup().await;
    let alice = common::create_account(&db, "Alice").await;

    let orphan = transactions::ActiveModel {
        account_id: Set(alice.into_inner()),
        kind: Set(TransactionKind::Deposit),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let err = HistoryRepository::new(db.clone())
        .history(alice)
        .await
        .unwrap_err();

    match err {
        LedgerRepoError::Ledger(LedgerError::MissingMovement {
            transaction_id,
            kind,
        }) => {
            assert_eq!(transaction_id, orphan.id);
            assert_eq!(kind, MovementKind::Deposit);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
