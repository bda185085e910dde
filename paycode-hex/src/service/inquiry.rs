//! Inquiry binding: one inquiry per transaction id.

use chrono::Utc;

use paycode_types::{AppError, CreateInquiryRequest, DomainError, Inquiry, InquiryRepository};

/// Application service binding transaction ids to payment codes.
#[derive(Clone)]
pub struct InquiryService<R: InquiryRepository> {
    repo: R,
}

impl<R: InquiryRepository> InquiryService<R> {
    /// Creates a new inquiry service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }


    /// Creates an inquiry unless the transaction id is already bound.
    ///
    /// The lookup is advisory; two concurrent creates can both pass it; the
    /// repository's uniqueness guarantee then rejects the loser with the same
    /// duplicate error.
    #[tracing::instrument(skip(self, req), fields(transaction_id = %req.transaction_id))]
    pub async fn create(&self, req: CreateInquiryRequest) -> Result<Inquiry, AppError> {
        req.validate()?;

        if self
            .repo
            .get_inquiry_by_transaction_id(&req.transaction_id)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateTransaction(req.transaction_id).into());
        }

        let amount = req
            .amount
            .ok_or_else(|| DomainError::missing_field("amount"))?;
        let inquiry = Inquiry::new(req.transaction_id, req.payment_code, amount, Utc::now())?;

        self.repo.create_inquiry(&inquiry).await?;
        Ok(inquiry)
    }

    /// Finds the inquiry bound to a transaction id.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Inquiry>, AppError> {
        self.repo
            .get_inquiry_by_transaction_id(transaction_id)
            .await
            .map_err(Into::into)
    }
}
