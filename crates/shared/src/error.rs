//! Application-wide error types.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Field-keyed list of human-readable validation messages.
///
/// Keys are sorted so responses are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding a single message.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns true if no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `Ok(())` when empty, otherwise a `ValidationFailed` error.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid caller identity.
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// Request failed validation; nothing was mutated.
    #[error("Validation failed: {0}")]
    ValidationFailed(FieldErrors),

    /// Referenced resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The atomic ledger write or a storage read failed.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Stored ledger data violates a structural invariant.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    #[must_use]
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed(FieldErrors::single(field, message))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotAuthenticated(_) => 401,
            Self::NotFound(_) => 404,
            Self::ValidationFailed(_) => 422,
            Self::StorageFailure(_) | Self::IntegrityViolation(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated(_) => "NOT_AUTHENTICATED",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
            Self::IntegrityViolation(_) => "INTEGRITY_VIOLATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for client-side errors (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
