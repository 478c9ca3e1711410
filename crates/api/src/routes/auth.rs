//! Authentication routes.

use axum::{Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use crate::response::{ApiJson, ApiResponse, ApiResult};
use wallet_core::auth::verify_password;
use wallet_db::AccountRepository;
use wallet_shared::AppError;
use wallet_shared::types::AccountId;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// POST /auth/login - Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let invalid = || AppError::NotAuthenticated("invalid email or password".to_string());

    let Some(account) = AccountRepository::new((*state.db).clone())
        .find_by_email(&payload.email)
        .await?
    else {
        info!(email = %payload.email, "Login attempt for unknown email");
        return Err(invalid().into());
    };

    if !verify_password(&payload.password, &account.password_hash)? {
        info!(account_id = %account.id, "Failed login attempt - invalid password");
        return Err(invalid().into());
    }

    let token = state
        .jwt_service
        .generate_access_token(AccountId::from_uuid(account.id))?;

    Ok(ApiResponse::ok(LoginResponse {
        token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}
