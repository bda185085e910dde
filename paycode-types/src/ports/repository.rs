//! Repository port traits.
//!
//! One gateway per entity. Adapters (Postgres, SQLite, InMemory) implement
//! all three; the engines only ask for the one they need.
//!
//! Lookups return `Ok(None)` when nothing matches. Not-found is never an error.

use chrono::{DateTime, Utc};

use crate::domain::{Inquiry, Payment, PaymentCode, PaymentCodeId, PaymentCodeStatus};
use crate::error::RepoError;

#[async_trait::async_trait]
pub trait PaymentCodeRepository: Send + Sync + 'static {
    /// Inserts a fully populated payment code.
    async fn create_payment_code(&self, code: &PaymentCode) -> Result<(), RepoError>;

    /// Gets a payment code by ID.
    async fn get_payment_code(&self, id: PaymentCodeId)
    -> Result<Option<PaymentCode>, RepoError>;

    /// Ids of ACTIVE codes whose expiration date is at or before `instant`.
    ///
    /// Callers must not rely on any particular order.
    async fn get_ids_expiring_by(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<PaymentCodeId>, RepoError>;

    /// Sets the status of a single code and bumps its `updated_at`.
    async fn update_payment_code_status(
        &self,
        id: PaymentCodeId,
        status: PaymentCodeStatus,
    ) -> Result<(), RepoError>;
}

#[async_trait::async_trait]
pub trait InquiryRepository: Send + Sync + 'static {
    /// Inserts an inquiry.
    ///
    /// Storage enforces transaction id uniqueness: a second insert for the
    /// same transaction id fails with `DomainError::DuplicateTransaction`.
    async fn create_inquiry(&self, inquiry: &Inquiry) -> Result<(), RepoError>;

    /// Finds the inquiry bound to a transaction id.
    async fn get_inquiry_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Inquiry>, RepoError>;
}

#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Inserts a payment.
    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError>;
}
