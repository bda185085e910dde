//! Payment domain model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::id::PaymentId;
use crate::error::DomainError;

/// A recorded settlement against a previously created inquiry.
///
/// Payments are immutable once created. The inquiry is referenced only by
/// `transaction_id`; amount and code are not reconciled against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: PaymentId,
    #[schema(example = "TRX-20240101-0001")]
    pub transaction_id: String,
    #[schema(example = "MERCHANT-001")]
    pub payment_code: String,
    /// Payer name
    #[schema(example = "Alice")]
    pub name: String,
    /// Opaque amount, stored as given
    #[schema(example = "150000")]
    pub amount: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment stamped at `now`, truncated to microseconds.
    pub fn new(
        transaction_id: String,
        payment_code: String,
        name: String,
        amount: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        for (field, value) in [
            ("transaction_id", &transaction_id),
            ("payment_code", &payment_code),
            ("name", &name),
            ("amount", &amount),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::missing_field(field));
            }
        }

        let now = now.trunc_subsecs(6);
        Ok(Self {
            id: PaymentId::new(),
            transaction_id,
            payment_code,
            name,
            amount,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a payment from database fields.
    pub fn from_parts(
        id: PaymentId,
        transaction_id: String,
        payment_code: String,
        name: String,
        amount: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            transaction_id,
            payment_code,
            name,
            amount,
            created_at,
            updated_at,
        }
    }
}
