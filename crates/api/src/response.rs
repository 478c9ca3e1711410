//! Response envelope and error rendering.
//!
//! Every response, success or failure, has the shape
//! `{success, code, data, error}` where `code` mirrors the HTTP status.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use wallet_core::auth::PasswordError;
use wallet_core::ledger::LedgerError;
use wallet_db::{AccountError, LedgerRepoError};
use wallet_shared::{AppError, FieldErrors, JwtError};

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// True for 2xx responses.
    pub success: bool,
    /// HTTP status code.
    pub code: u16,
    /// Payload on success.
    pub data: Option<T>,
    /// Message or structured error on failure.
    pub error: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with `data`.
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    /// 201 Created with `data`.
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    /// Successful response with an explicit status.
    pub fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            success: true,
            code: status.as_u16(),
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Handler error; renders as a failed envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Returns the wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }

    fn error_body(&self) -> Value {
        match &self.0 {
            AppError::ValidationFailed(errors) => json!({
                "message": "Validation failed",
                "errors": errors,
            }),
            other => json!(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        if !self.0.is_client_error() {
            error!(error = %self.0, error_code = self.0.error_code(), "Request failed");
        }

        let body = ApiResponse::<()> {
            success: false,
            code,
            data: None,
            error: Some(self.error_body()),
        };
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self(AppError::ValidationFailed(errors))
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let app = match &err {
            LedgerError::InvalidAmount(_) | LedgerError::InsufficientFunds { .. } => {
                AppError::validation("amount", err.to_string())
            }
            LedgerError::SelfTransfer => AppError::validation("recipient_email", err.to_string()),
            LedgerError::AccountNotFound(_) => AppError::NotFound(err.to_string()),
            LedgerError::MissingMovement { .. } | LedgerError::CorruptRow(_) => {
                AppError::IntegrityViolation(err.to_string())
            }
        };
        Self(app)
    }
}

impl From<LedgerRepoError> for ApiError {
    fn from(err: LedgerRepoError) -> Self {
        match err {
            LedgerRepoError::Ledger(e) => e.into(),
            LedgerRepoError::Database(e) => Self(AppError::StorageFailure(e.to_string())),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let app = match err {
            AccountError::EmailTaken(_) => {
                AppError::validation("email", "This email is already registered.")
            }
            AccountError::NotFound(id) => AppError::NotFound(format!("Account {id}")),
            AccountError::Database(e) => AppError::StorageFailure(e.to_string()),
        };
        Self(app)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(AppError::StorageFailure(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingError(_) => Self(AppError::Internal(err.to_string())),
            JwtError::Expired | JwtError::DecodingError(_) => {
                Self(AppError::NotAuthenticated(err.to_string()))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::validation("body", rejection.body_text()))
    }
}

/// JSON body extractor whose rejections use the envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
