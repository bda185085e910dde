//! Shared row-conversion helpers for the SQL backends.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use paycode_types::{DomainError, PaymentCodeStatus, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_status(s: &str) -> Result<PaymentCodeStatus, RepoError> {
    PaymentCodeStatus::from_str(s)
        .map_err(|_| RepoError::Database(format!("Unknown payment code status: {}", s)))
}

pub fn parse_amount(s: &str) -> Result<Decimal, RepoError> {
    Decimal::from_str(s).map_err(|e| RepoError::Database(format!("Bad amount {}: {}", s, e)))
}

/// Fixed-width UTC text so lexical order matches chronological order.
#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| RepoError::Database(e.to_string()))?
        .with_timezone(&Utc))
}

#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Error mapping
// ─────────────────────────────────────────────────────────────────────────────

/// Maps an inquiry insert failure, turning a UNIQUE violation on
/// `transaction_id` into the domain duplicate error.
pub fn map_inquiry_insert_error(err: sqlx::Error, transaction_id: &str) -> RepoError {
    let is_unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if is_unique {
        DomainError::DuplicateTransaction(transaction_id.to_string()).into()
    } else {
        RepoError::Database(err.to_string())
    }
}
