//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use migration::Migrator;
pub use repositories::{
    AccountError, AccountRepository, CreateAccountInput, HistoryRepository, LedgerReceipt,
    LedgerRepoError, LedgerRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use wallet_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool bounds.
///
/// SQLite pools are pinned to one connection. An in-memory database is
/// private to its connection, and a file database aborts a deferred write
/// transaction with `SQLITE_BUSY` when another connection holds the write
/// lock, so ledger operations must queue on the pool instead.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let (max, min) = if is_sqlite(&config.url) {
        (1, 1)
    } else {
        (config.max_connections, config.min_connections)
    };

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(max)
        .min_connections(min)
        .sqlx_logging(false);

    Database::connect(options).await
}

fn is_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:")
}

/// Applies all pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
