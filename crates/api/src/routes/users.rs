//! Account registration, directory, and balance routes.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiJson, ApiResponse, ApiResult};
use crate::validation::validate_registration;
use wallet_core::auth::hash_password;
use wallet_db::entities::accounts;
use wallet_db::{AccountRepository, CreateAccountInput};
use wallet_shared::types::AccountId;

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}

/// Routes that require bearer authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/balance", get(get_balance))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for registering an account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."))]
    pub name: String,
    /// Login email; must be unique.
    #[serde(default)]
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    /// Plain-text password, hashed before storage.
    #[serde(default)]
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
}

/// Full account view returned on registration.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Current balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<accounts::Model> for UserResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Registration result.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    /// The new account.
    pub user: UserResponse,
    /// Bearer token for the new account.
    pub token: String,
}

/// Directory listing entry.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
}

/// Balance lookup result.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users - Register an account and issue its first token.
async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<ApiResponse<CreatedUser>> {
    validate_registration(&state, &payload).await?;

    let password_hash = hash_password(&payload.password)?;

    // Sign first so a signing failure leaves no account behind.
    let id = AccountId::new();
    let token = state.jwt_service.generate_access_token(id)?;

    let account = AccountRepository::new((*state.db).clone())
        .create(CreateAccountInput {
            id,
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;

    info!(account_id = %id, email = %account.email, "Account registered");

    Ok(ApiResponse::created(CreatedUser {
        user: account.into(),
        token,
    }))
}

/// GET /users - List the account directory.
async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<ApiResponse<Vec<UserSummary>>> {
    let accounts = AccountRepository::new((*state.db).clone()).list().await?;

    Ok(ApiResponse::ok(
        accounts
            .into_iter()
            .map(|a| UserSummary {
                id: a.id,
                name: a.name,
                email: a.email,
            })
            .collect(),
    ))
}

/// GET /users/balance - Current balance of the caller.
async fn get_balance(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<ApiResponse<BalanceResponse>> {
    let balance = AccountRepository::new((*state.db).clone())
        .balance(user.id)
        .await?;

    Ok(ApiResponse::ok(BalanceResponse { balance }))
}
