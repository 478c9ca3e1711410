//! Request validation layer.
//!
//! Runs before any ledger operation and reports every failed rule as a
//! field-keyed message. Nothing is mutated when validation fails.

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResult;
use crate::routes::users::CreateUserRequest;
use wallet_core::limits::LimitKind;
use wallet_db::entities::accounts;
use wallet_db::{AccountRepository, LedgerRepository};
use wallet_shared::FieldErrors;
use wallet_shared::types::{Amount, AmountError};

/// Parses a raw JSON amount into a validated [`Amount`].
///
/// Accepts JSON numbers and numeric strings.
///
/// # Errors
///
/// Returns a human-readable message describing the first failed rule.
pub fn parse_amount(raw: Option<&Value>) -> Result<Amount, String> {
    let text = match raw {
        None | Some(Value::Null) => return Err("The amount field is required.".to_string()),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => return Err("The amount field is required.".to_string()),
        Some(_) => return Err("The amount must be numeric.".to_string()),
    };

    let value = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| "The amount must be numeric.".to_string())?;

    Amount::new(value).map_err(|e| match e {
        AmountError::NotPositive(_) => "The amount must be at least 0.01.".to_string(),
        AmountError::TooPrecise(_) => "The amount may have at most 2 decimal places.".to_string(),
    })
}

/// Validates a deposit for `user`.
///
/// # Errors
///
/// Returns `ValidationFailed` for a malformed amount or when the daily
/// deposit limit would be exceeded.
pub async fn validate_deposit(
    state: &AppState,
    user: &AuthUser,
    raw: Option<&Value>,
) -> ApiResult<Amount> {
    let amount = parse_amount(raw).map_err(|m| FieldErrors::single("amount", m))?;

    let mut errors = FieldErrors::new();
    if exceeds_limit(state, user, LimitKind::Deposit, amount).await? {
        errors.add("amount", "Daily deposit limit exceeded.");
    }
    errors.into_result()?;
    Ok(amount)
}

/// Validates a withdrawal for `user`.
///
/// # Errors
///
/// Returns `ValidationFailed` for a malformed amount, an amount above the
/// balance, or when the daily withdrawal limit would be exceeded.
pub async fn validate_withdraw(
    state: &AppState,
    user: &AuthUser,
    raw: Option<&Value>,
) -> ApiResult<Amount> {
    let amount = parse_amount(raw).map_err(|m| FieldErrors::single("amount", m))?;

    let mut errors = FieldErrors::new();
    if amount.value() > user.balance {
        errors.add("amount", "Insufficient balance for withdrawal.");
    }
    if exceeds_limit(state, user, LimitKind::Withdraw, amount).await? {
        errors.add("amount", "Daily withdrawal limit exceeded.");
    }
    errors.into_result()?;
    Ok(amount)
}

/// Validates a transfer from `user` and resolves the recipient.
///
/// # Errors
///
/// Returns `ValidationFailed` for a malformed amount, an amount above the
/// balance, a missing or unknown recipient, or a transfer to oneself.
pub async fn validate_transfer(
    state: &AppState,
    user: &AuthUser,
    raw_amount: Option<&Value>,
    recipient_email: Option<&str>,
) -> ApiResult<(Amount, accounts::Model)> {
    let mut errors = FieldErrors::new();

    let amount = match parse_amount(raw_amount) {
        Ok(amount) => {
            if amount.value() > user.balance {
                errors.add("amount", "Insufficient balance for transfer.");
            }
            Some(amount)
        }
        Err(message) => {
            errors.add("amount", message);
            None
        }
    };

    let recipient = match recipient_email.map(str::trim).filter(|e| !e.is_empty()) {
        None => {
            errors.add("recipient_email", "The recipient_email field is required.");
            None
        }
        Some(email) => {
            let found = AccountRepository::new((*state.db).clone())
                .find_by_email(email)
                .await?;
            match found {
                None => {
                    errors.add("recipient_email", "Recipient not found.");
                    None
                }
                Some(account) if account.id == user.id.into_inner() => {
                    errors.add("recipient_email", "Cannot transfer to yourself.");
                    None
                }
                Some(account) => Some(account),
            }
        }
    };

    match (amount, recipient) {
        (Some(amount), Some(recipient)) if errors.is_empty() => Ok((amount, recipient)),
        _ => Err(errors.into()),
    }
}

/// Runs the field rules on a registration and checks email uniqueness.
///
/// # Errors
///
/// Returns `ValidationFailed` with every failed rule.
pub async fn validate_registration(state: &AppState, input: &CreateUserRequest) -> ApiResult<()> {
    let mut errors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => field_errors(&e),
    };

    if errors.get("email").is_none()
        && AccountRepository::new((*state.db).clone())
            .email_exists(&input.email)
            .await?
    {
        errors.add("email", "This email is already registered.");
    }

    Ok(errors.into_result()?)
}

/// Converts `validator` output into field-keyed messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, list) in errors.field_errors() {
        for error in list {
            let message = error
                .message
                .as_ref()
                .map_or_else(|| format!("The {field} field is invalid."), ToString::to_string);
            out.add(field.as_ref(), message);
        }
    }
    out
}

async fn exceeds_limit(
    state: &AppState,
    user: &AuthUser,
    kind: LimitKind,
    amount: Amount,
) -> ApiResult<bool> {
    Ok(LedgerRepository::new((*state.db).clone())
        .exceeds_daily_limit(&state.limits, user.id, kind, amount.value(), Utc::now())
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    #[case(json!(10), dec!(10.00))]
    #[case(json!(0.01), dec!(0.01))]
    #[case(json!(25.5), dec!(25.50))]
    #[case(json!("12.34"), dec!(12.34))]
    #[case(json!(" 7 "), dec!(7.00))]
    fn test_parse_amount_accepts(#[case] raw: Value, #[case] expected: Decimal) {
        assert_eq!(parse_amount(Some(&raw)).unwrap().value(), expected);
    }

    #[rstest]
    #[case(None, "The amount field is required.")]
    #[case(Some(json!(null)), "The amount field is required.")]
    #[case(Some(json!("")), "The amount field is required.")]
    #[case(Some(json!("abc")), "The amount must be numeric.")]
    #[case(Some(json!(true)), "The amount must be numeric.")]
    #[case(Some(json!(0)), "The amount must be at least 0.01.")]
    #[case(Some(json!(-5)), "The amount must be at least 0.01.")]
    #[case(Some(json!(0.001)), "The amount may have at most 2 decimal places.")]
    fn test_parse_amount_rejects(#[case] raw: Option<Value>, #[case] message: &str) {
        assert_eq!(parse_amount(raw.as_ref()).unwrap_err(), message);
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 8, message = "too short"))]
        password: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_field_errors_conversion() {
        let probe = Probe {
            password: "short".into(),
            email: "nope".into(),
        };
        let errors = field_errors(&probe.validate().unwrap_err());
        assert_eq!(errors.get("password"), Some(&["too short".to_string()][..]));
        assert_eq!(
            errors.get("email"),
            Some(&["The email field is invalid.".to_string()][..])
        );
    }
}
