//! Inquiry domain model.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::id::InquiryId;
use crate::error::DomainError;

/// Binds a client transaction id to a payment code and amount.
///
/// At most one inquiry exists per `transaction_id`; a payment can only be
/// recorded for a transaction id that has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Inquiry {
    pub id: InquiryId,
    /// Client-supplied transaction id
    #[schema(example = "TRX-20240101-0001")]
    pub transaction_id: String,
    /// Payment code the payer is inquiring about (not checked for existence)
    #[schema(example = "MERCHANT-001")]
    pub payment_code: String,
    #[schema(value_type = String, example = "150000.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    /// Creates a new inquiry stamped at `now`, truncated to microseconds.
    pub fn new(
        transaction_id: String,
        payment_code: String,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if transaction_id.trim().is_empty() {
            return Err(DomainError::missing_field("transaction_id"));
        }
        if payment_code.trim().is_empty() {
            return Err(DomainError::missing_field("payment_code"));
        }

        let now = now.trunc_subsecs(6);
        Ok(Self {
            id: InquiryId::new(),
            transaction_id,
            payment_code,
            amount,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs an inquiry from database fields.
    pub fn from_parts(
        id: InquiryId,
        transaction_id: String,
        payment_code: String,
        amount: Decimal,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            transaction_id,
            payment_code,
            amount,
            created_at,
            updated_at,
        }
    }
}
