//! Account repository: the account directory.
//!
//! Resolves identities to account rows and creates new accounts. Balances
//! are read here but only ever written by the ledger repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use wallet_shared::types::{AccountId, MONEY_SCALE};

use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Email already registered.
    #[error("Email '{0}' is already registered")]
    EmailTaken(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Pre-generated account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
}

/// Account repository for directory operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::EmailTaken` if the email is already registered.
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, AccountError> {
        if self.email_exists(&input.email).await? {
            return Err(AccountError::EmailTaken(input.email));
        }

        let account = accounts::ActiveModel {
            id: Set(input.id.into_inner()),
            name: Set(input.name),
            email: Set(input.email.clone()),
            password_hash: Set(input.password_hash),
            balance: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
        };

        account.insert(&self.db).await.map_err(|e| match e.sql_err() {
            // Lost a race with a concurrent registration.
            Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::EmailTaken(input.email),
            _ => AccountError::Database(e),
        })
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|found| found.map(normalize))
    }

    /// Finds an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map(|found| found.map(normalize))
    }

    /// Resolves an email to an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if no account has that email.
    pub async fn resolve_by_email(&self, email: &str) -> Result<accounts::Model, AccountError> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound(email.to_string()))
    }

    /// Returns the current balance of an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account does not exist.
    pub async fn balance(&self, id: AccountId) -> Result<Decimal, AccountError> {
        self.find_by_id(id)
            .await?
            .map(|account| account.balance)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    /// Lists all accounts ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<accounts::Model>, DbErr> {
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .order_by_asc(accounts::Column::Email)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(normalize).collect())
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

/// Pins the balance to two decimal places.
///
/// SQLite hands decimals back through `f64`.
pub(crate) fn money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_SCALE)
}

fn normalize(mut account: accounts::Model) -> accounts::Model {
    account.balance = money(account.balance);
    account
}
