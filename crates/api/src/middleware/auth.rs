//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::AppState;
use crate::response::ApiError;
use wallet_db::AccountRepository;
use wallet_shared::AppError;
use wallet_shared::types::AccountId;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Resolves the token subject to a live account
/// 4. Stores the account in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthenticated("missing bearer token");
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return ApiError::from(e).into_response();
        }
    };

    let account_id = claims.account_id();
    let account = match AccountRepository::new((*state.db).clone())
        .find_by_id(account_id)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            info!(account_id = %account_id, "Token for unknown account");
            return unauthenticated("account no longer exists");
        }
        Err(e) => return ApiError::from(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: account_id,
        name: account.name,
        email: account.email,
        balance: account.balance,
    });
    next.run(request).await
}

fn unauthenticated(reason: &str) -> Response {
    ApiError(AppError::NotAuthenticated(reason.to_string())).into_response()
}

/// The authenticated account, resolved once per request.
///
/// The balance is a snapshot taken when the request was authenticated;
/// ledger operations re-read it under lock.
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let account_id = user.id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Account ID (the token subject).
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Balance at authentication time.
    pub balance: Decimal,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError(AppError::NotAuthenticated("authentication required".into())))
    }
}
