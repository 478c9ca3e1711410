//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use std::env;

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use uuid::Uuid;
use wallet_db::entities::accounts;
use wallet_db::{AccountRepository, CreateAccountInput, Migrator};
use wallet_shared::config::DatabaseConfig;
use wallet_shared::types::AccountId;

/// Opens a fresh in-memory database with the full schema applied.
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Opens a file-backed database through the configured pool.
///
/// The returned directory owns the database file and must outlive the
/// connection.
pub async fn setup_file(max_connections: u32) -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("wallet.db").display());
    let db = connect_pool(url, max_connections).await;
    (dir, db)
}

/// Opens the PostgreSQL database named by `DATABASE_URL`, if any.
pub async fn setup_postgres() -> Option<DatabaseConnection> {
    let url = env::var("DATABASE_URL").ok()?;
    if !url.starts_with("postgres") {
        return None;
    }
    Some(connect_pool(url, 16).await)
}

async fn connect_pool(url: String, max_connections: u32) -> DatabaseConnection {
    let config = DatabaseConfig {
        url,
        max_connections,
        min_connections: 1,
        run_migrations: true,
    };
    let db = wallet_db::connect_with(&config)
        .await
        .expect("Failed to open database");
    wallet_db::run_migrations(&db)
        .await
        .expect("Failed to run migrations");
    db
}

/// Registers an account and returns its ID.
pub async fn create_account(db: &DatabaseConnection, name: &str) -> AccountId {
    let id = AccountId::new();
    AccountRepository::new(db.clone())
        .create(CreateAccountInput {
            id,
            name: name.to_string(),
            email: format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
            password_hash: "$argon2id$test_hash".to_string(),
        })
        .await
        .expect("Failed to create account");
    id
}

/// Registers an account with an opening balance that has no history.
pub async fn create_funded_account(
    db: &DatabaseConnection,
    name: &str,
    balance: Decimal,
) -> AccountId {
    let id = create_account(db, name).await;
    accounts::ActiveModel {
        id: Set(id.into_inner()),
        balance: Set(balance),
        ..Default::default()
    }
    .update(db)
    .await
    .expect("Failed to set opening balance");
    id
}

/// Reads the stored balance.
pub async fn balance_of(db: &DatabaseConnection, id: AccountId) -> Decimal {
    AccountRepository::new(db.clone())
        .balance(id)
        .await
        .expect("Failed to read balance")
}
