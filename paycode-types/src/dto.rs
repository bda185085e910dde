//! Data Transfer Objects (DTOs) for requests.
//!
//! Every field defaults when absent so that a missing field surfaces as a
//! `field '<name>' is required` validation error rather than a body
//! deserialization failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::missing_field(field));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment code DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to issue a new payment code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentCodeRequest {
    /// Merchant-chosen code string
    #[serde(default)]
    #[schema(example = "MERCHANT-001")]
    pub payment_code: String,
    /// Display name
    #[serde(default)]
    #[schema(example = "Coffee beans 1kg")]
    pub name: String,
}

impl CreatePaymentCodeRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require("payment_code", &self.payment_code)?;
        require("name", &self.name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inquiry DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to bind a transaction id to a payment code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateInquiryRequest {
    /// Client transaction id, unique across inquiries
    #[serde(default)]
    #[schema(example = "TRX-20240101-0001")]
    pub transaction_id: String,
    #[serde(default)]
    #[schema(example = "MERCHANT-001")]
    pub payment_code: String,
    /// Decimal amount, as a string or number
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "150000.00")]
    pub amount: Option<Decimal>,
}

impl CreateInquiryRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require("transaction_id", &self.transaction_id)?;
        require("payment_code", &self.payment_code)?;
        if self.amount.is_none() {
            return Err(DomainError::missing_field("amount"));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to record a payment against an existing inquiry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Transaction id of a previously created inquiry
    #[serde(default)]
    #[schema(example = "TRX-20240101-0001")]
    pub transaction_id: String,
    #[serde(default)]
    #[schema(example = "MERCHANT-001")]
    pub payment_code: String,
    /// Payer name
    #[serde(default)]
    #[schema(example = "Alice")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "150000")]
    pub amount: String,
}

impl CreatePaymentRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require("transaction_id", &self.transaction_id)?;
        require("payment_code", &self.payment_code)?;
        require("name", &self.name)?;
        require("amount", &self.amount)
    }
}
