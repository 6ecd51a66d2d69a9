//! HTTP mapping for application errors.
//!
//! Every handler funnels failures through [`error_response`], so the
//! wire shape is uniform: `{"error": CODE, "message": text}` with the
//! status the error kind carries. Infrastructure failures are logged
//! and their details withheld from the body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use tracing::error;

use finbook_shared::AppError;

/// Renders an error with its mapped status and the uniform body.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match err {
        AppError::NotFound(msg) | AppError::Validation(msg) | AppError::BusinessRule(msg) => {
            msg.clone()
        }
        AppError::Database(_) | AppError::Internal(_) => {
            error!(error = %err, "request failed");
            "An internal error occurred".to_string()
        }
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message,
        })),
    )
        .into_response()
}

/// Parses a typed id from its hex form; malformed input is a 422.
pub(crate) fn parse_id<I: FromStr>(raw: &str, what: &str) -> Result<I, Response> {
    raw.parse()
        .map_err(|_| error_response(&AppError::Validation(format!("invalid {what} id '{raw}'"))))
}

/// Parses a decimal amount string; malformed input or more than two
/// decimal places is a 422.
pub(crate) fn parse_amount(raw: &str, what: &str) -> Result<Decimal, Response> {
    let amount: Decimal = raw.parse().map_err(|_| {
        error_response(&AppError::Validation(format!(
            "{what} must be a decimal number, got '{raw}'"
        )))
    })?;
    if amount.normalize().scale() > 2 {
        return Err(error_response(&AppError::Validation(format!(
            "{what} must have at most two decimal places, got '{raw}'"
        ))));
    }
    Ok(amount)
}

/// Parses an ISO `YYYY-MM-DD` day; malformed input is a 422.
pub(crate) fn parse_day(raw: &str, what: &str) -> Result<chrono::NaiveDate, Response> {
    raw.parse().map_err(|_| {
        error_response(&AppError::Validation(format!(
            "{what} must be a YYYY-MM-DD date, got '{raw}'"
        )))
    })
}

/// Parses an RFC 3339 timestamp; malformed input is a 422.
pub(crate) fn parse_timestamp(
    raw: &str,
    what: &str,
) -> Result<chrono::DateTime<chrono::Utc>, Response> {
    raw.parse().map_err(|_| {
        error_response(&AppError::Validation(format!(
            "{what} must be an RFC 3339 timestamp, got '{raw}'"
        )))
    })
}

/// Rejects blank required text fields as a 422.
pub(crate) fn require_text(raw: &str, what: &str) -> Result<(), Response> {
    if raw.trim().is_empty() {
        return Err(error_response(&AppError::Validation(format!(
            "{what} must not be empty"
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finbook_shared::types::UserId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::BusinessRule("x".into()), StatusCode::CONFLICT),
            (
                AppError::Database("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected);
        }
    }

    #[test]
    fn test_parse_id_accepts_hex_and_rejects_garbage() {
        let id = UserId::new();
        let parsed: UserId = parse_id(&id.to_string(), "user").expect("hex id parses");
        assert_eq!(parsed, id);

        assert!(parse_id::<UserId>("not-an-id", "user").is_err());
        assert!(parse_id::<UserId>("", "user").is_err());
    }

    #[test]
    fn test_parse_amount_two_places_max() {
        assert!(parse_amount("10", "amount").is_ok());
        assert!(parse_amount("10.5", "amount").is_ok());
        assert!(parse_amount("10.55", "amount").is_ok());
        // Trailing zeros normalize away.
        assert!(parse_amount("10.550", "amount").is_ok());

        assert!(parse_amount("10.555", "amount").is_err());
        assert!(parse_amount("abc", "amount").is_err());
    }

    #[test]
    fn test_parse_day_rejects_malformed() {
        assert!(parse_day("2025-06-15", "period_start").is_ok());
        assert!(parse_day("15/06/2025", "period_start").is_err());
        assert!(parse_day("2025-13-40", "period_start").is_err());
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        assert!(parse_timestamp("2025-06-15T12:00:00Z", "from").is_ok());
        assert!(parse_timestamp("yesterday", "from").is_err());
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("name", "name").is_ok());
        assert!(require_text("", "name").is_err());
        assert!(require_text("   ", "name").is_err());
    }
}
