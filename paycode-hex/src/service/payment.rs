//! Payment recording.

use chrono::Utc;
use tracing::warn;

use paycode_types::{AppError, CreatePaymentRequest, Payment, PaymentPublisher, PaymentRepository};

/// Application service recording payments and publishing them downstream.
///
/// Does not check that an inquiry exists for the transaction id; callers
/// gate on `InquiryService::get_by_transaction_id` first.
#[derive(Clone)]
pub struct PaymentService<R: PaymentRepository, P: PaymentPublisher> {
    repo: R,
    publisher: P,
}

impl<R: PaymentRepository, P: PaymentPublisher> PaymentService<R, P> {
    /// Creates a new payment service.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }


    /// Persists a payment, then publishes it.
    ///
    /// A publish failure is returned after the payment is already stored.
    #[tracing::instrument(skip(self, req), fields(transaction_id = %req.transaction_id))]
    pub async fn create(&self, req: CreatePaymentRequest) -> Result<Payment, AppError> {
        req.validate()?;

        let payment = Payment::new(
            req.transaction_id,
            req.payment_code,
            req.name,
            req.amount,
            Utc::now(),
        )?;
        self.repo.create_payment(&payment).await?;

        if let Err(e) = self.publisher.publish(&payment).await {
            warn!(id = %payment.id, error = %e, "payment stored but publish failed");
            return Err(e.into());
        }

        Ok(payment)
    }
}
