//! Ledger routes: deposit, withdraw, transfer, and history.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiJson, ApiResponse, ApiResult};
use crate::validation::{validate_deposit, validate_transfer, validate_withdraw};
use wallet_core::history::HistoryItem;
use wallet_core::ledger::MovementKind;
use wallet_db::{HistoryRepository, LedgerReceipt, LedgerRepository};
use wallet_shared::types::{AccountId, Amount};

/// Creates the ledger routes. All of them require authentication.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/transfer", post(transfer))
        .route("/history", get(history))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for deposits and withdrawals.
///
/// The amount is kept raw so that validation can report shape errors per
/// field instead of rejecting the whole body.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Positive amount, number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
}

/// Request body for transfers.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Positive amount, number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Recipient's email.
    #[serde(default, alias = "recipient")]
    pub recipient_email: Option<String>,
}

/// Result of a committed movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Transaction envelope ID.
    pub transaction_id: i64,
    /// Movement kind.
    #[serde(rename = "type")]
    pub kind: MovementKind,
    /// Amount moved.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Caller's balance after the movement.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Recipient name, for transfers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Commit time.
    pub created_at: DateTime<Utc>,
}

impl MovementResponse {
    fn new(receipt: LedgerReceipt, amount: Amount) -> Self {
        Self {
            transaction_id: receipt.transaction_id,
            kind: receipt.kind,
            amount: amount.value(),
            balance: receipt.balance,
            recipient: None,
            created_at: receipt.created_at,
        }
    }
}

/// History listing.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Movements, oldest first.
    pub transactions: Vec<HistoryItem>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /deposit - Credit the caller's account.
async fn deposit(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<AmountRequest>,
) -> ApiResult<ApiResponse<MovementResponse>> {
    let amount = validate_deposit(&state, &user, payload.amount.as_ref()).await?;

    let receipt = LedgerRepository::new((*state.db).clone())
        .deposit(user.id, amount.value())
        .await?;

    info!(account_id = %user.id, amount = %amount, "Deposit completed");
    Ok(ApiResponse::ok(MovementResponse::new(receipt, amount)))
}

/// POST /withdraw - Debit the caller's account.
async fn withdraw(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<AmountRequest>,
) -> ApiResult<ApiResponse<MovementResponse>> {
    let amount = validate_withdraw(&state, &user, payload.amount.as_ref()).await?;

    let receipt = LedgerRepository::new((*state.db).clone())
        .withdraw(user.id, amount.value())
        .await?;

    info!(account_id = %user.id, amount = %amount, "Withdrawal completed");
    Ok(ApiResponse::ok(MovementResponse::new(receipt, amount)))
}

/// POST /transfer - Move money from the caller to another account.
async fn transfer(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<TransferRequest>,
) -> ApiResult<ApiResponse<MovementResponse>> {
    let (amount, recipient) = validate_transfer(
        &state,
        &user,
        payload.amount.as_ref(),
        payload.recipient_email.as_deref(),
    )
    .await?;

    let recipient_id = AccountId::from_uuid(recipient.id);
    let receipt = LedgerRepository::new((*state.db).clone())
        .transfer(user.id, recipient_id, amount.value())
        .await?;

    info!(
        sender_id = %user.id,
        recipient_id = %recipient_id,
        amount = %amount,
        "Transfer completed"
    );

    let mut response = MovementResponse::new(receipt, amount);
    response.recipient = Some(recipient.name);
    Ok(ApiResponse::ok(response))
}

/// GET /history - The caller's movements, oldest first.
async fn history(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<ApiResponse<HistoryResponse>> {
    let transactions = HistoryRepository::new((*state.db).clone())
        .history(user.id)
        .await?;

    Ok(ApiResponse::ok(HistoryResponse { transactions }))
}
