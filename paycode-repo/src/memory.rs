//! In-memory repository adapter.
//!
//! Backs all three repository ports with `DashMap`s. Used by tests and by
//! `memory://` database URLs; nothing survives a restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use paycode_types::{
    DomainError, Inquiry, InquiryRepository, Payment, PaymentCode, PaymentCodeId,
    PaymentCodeRepository, PaymentCodeStatus, PaymentId, PaymentRepository, RepoError,
};

/// Thread-safe in-memory store for payment codes, inquiries and payments.
///
/// Inquiries are keyed by transaction id, so the uniqueness check and the
/// insert happen under one shard lock.
#[derive(Default, Clone)]
pub struct InMemoryRepo {
    payment_codes: Arc<DashMap<PaymentCodeId, PaymentCode>>,
    inquiries: Arc<DashMap<String, Inquiry>>,
    payments: Arc<DashMap<PaymentId, Payment>>,
}

impl InMemoryRepo {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Payments recorded against a transaction id.
    pub fn payments_for_transaction(&self, transaction_id: &str) -> Vec<Payment> {
        self.payments
            .iter()
            .filter(|p| p.transaction_id == transaction_id)
            .map(|p| p.value().clone())
            .collect()
    }
}

#[async_trait]
impl PaymentCodeRepository for InMemoryRepo {
    async fn create_payment_code(&self, code: &PaymentCode) -> Result<(), RepoError> {
        match self.payment_codes.entry(code.id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "payment code {} already exists",
                code.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(code.clone());
                Ok(())
            }
        }
    }

    async fn get_payment_code(&self, id: PaymentCodeId) -> Result<Option<PaymentCode>, RepoError> {
        Ok(self.payment_codes.get(&id).map(|c| c.value().clone()))
    }

    async fn get_ids_expiring_by(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<PaymentCodeId>, RepoError> {
        let mut due: Vec<(DateTime<Utc>, PaymentCodeId)> = self
            .payment_codes
            .iter()
            .filter(|c| c.is_past_due(instant))
            .map(|c| (c.expiration_date, c.id))
            .collect();
        due.sort();
        Ok(due.into_iter().map(|(_, id)| id).collect())
    }

    async fn update_payment_code_status(
        &self,
        id: PaymentCodeId,
        status: PaymentCodeStatus,
    ) -> Result<(), RepoError> {
        let mut code = self.payment_codes.get_mut(&id).ok_or(RepoError::NotFound)?;
        code.status = status;
        code.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl InquiryRepository for InMemoryRepo {
    async fn create_inquiry(&self, inquiry: &Inquiry) -> Result<(), RepoError> {
        match self.inquiries.entry(inquiry.transaction_id.clone()) {
            Entry::Occupied(_) => {
                Err(DomainError::DuplicateTransaction(inquiry.transaction_id.clone()).into())
            }
            Entry::Vacant(slot) => {
                slot.insert(inquiry.clone());
                Ok(())
            }
        }
    }

    async fn get_inquiry_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Inquiry>, RepoError> {
        Ok(self.inquiries.get(transaction_id).map(|i| i.value().clone()))
    }
}

#[async_trait]
impl PaymentRepository for InMemoryRepo {
    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        self.payments.insert(payment.id, payment.clone());
        Ok(())
    }
}
