//! PaymentCode domain model.

use chrono::{DateTime, Months, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::id::PaymentCodeId;
use crate::error::DomainError;

/// How long a freshly issued code stays payable: 50 calendar years.
pub const VALIDITY_MONTHS: u32 = 50 * 12;

/// Lifecycle status of a payment code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentCodeStatus {
    Active,
    Inactive,
    Expired,
}

impl PaymentCodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Expired => "EXPIRED",
        }
    }
}

impl AsRef<str> for PaymentCodeStatus {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PaymentCodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentCodeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(DomainError::ValidationError(format!(
                "Unknown payment code status: {}",
                other
            ))),
        }
    }
}

/// A merchant-issued code identifying a payable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentCode {
    /// Server-assigned identifier
    pub id: PaymentCodeId,
    /// Merchant-chosen code string
    #[schema(example = "MERCHANT-001")]
    pub payment_code: String,
    /// Display name
    #[schema(example = "Coffee beans 1kg")]
    pub name: String,
    pub status: PaymentCodeStatus,
    /// After this instant the sweep moves the code to EXPIRED
    pub expiration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentCode {
    /// Issues a new ACTIVE code valid for [`VALIDITY_MONTHS`] from `now`.
    ///
    /// Timestamps are kept at microsecond precision, matching what the
    /// stores persist.
    ///
    /// # Validation
    /// - `payment_code` and `name` cannot be blank
    pub fn issue(
        payment_code: String,
        name: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if payment_code.trim().is_empty() {
            return Err(DomainError::missing_field("payment_code"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::missing_field("name"));
        }

        let now = now.trunc_subsecs(6);
        let expiration_date = now
            .checked_add_months(Months::new(VALIDITY_MONTHS))
            .ok_or_else(|| {
                DomainError::ValidationError("Expiration date out of range".into())
            })?;

        Ok(Self {
            id: PaymentCodeId::new(),
            payment_code,
            name,
            status: PaymentCodeStatus::Active,
            expiration_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a payment code from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PaymentCodeId,
        payment_code: String,
        name: String,
        status: PaymentCodeStatus,
        expiration_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            payment_code,
            name,
            status,
            expiration_date,
            created_at,
            updated_at,
        }
    }

    /// True when the sweep would pick this code up at `now`.
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PaymentCodeStatus::Active && self.expiration_date <= now
    }
}
