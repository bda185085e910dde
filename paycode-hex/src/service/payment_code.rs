//! Payment code lifecycle: issuance, retrieval, expiry sweep.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use paycode_types::{
    AppError, CreatePaymentCodeRequest, PaymentCode, PaymentCodeId, PaymentCodeNotifier,
    PaymentCodeRepository, PaymentCodeStatus,
};

/// Application service owning the [`PaymentCode`] lifecycle.
///
/// Generic over the repository and notifier ports; both are injected at
/// construction and may be shared with other services.
#[derive(Clone)]
pub struct PaymentCodeService<R: PaymentCodeRepository, N: PaymentCodeNotifier> {
    repo: R,
    notifier: N,
}

impl<R: PaymentCodeRepository, N: PaymentCodeNotifier> PaymentCodeService<R, N> {
    /// Creates a new payment code service.
    pub fn new(repo: R, notifier: N) -> Self {
        Self { repo, notifier }
    }


    /// Issues a new ACTIVE payment code and notifies downstream.
    ///
    /// A notifier failure is returned even though the code is already
    /// persisted; nothing is rolled back.
    #[tracing::instrument(skip(self, req), fields(payment_code = %req.payment_code))]
    pub async fn create(&self, req: CreatePaymentCodeRequest) -> Result<PaymentCode, AppError> {
        req.validate()?;

        let code = PaymentCode::issue(req.payment_code, req.name, Utc::now())?;
        self.repo.create_payment_code(&code).await?;

        if let Err(e) = self.notifier.notify(&code).await {
            warn!(id = %code.id, error = %e, "payment code stored but notify failed");
            return Err(e.into());
        }

        info!(id = %code.id, expires = %code.expiration_date, "payment code issued");
        Ok(code)
    }

    /// Gets a payment code by ID, notifying downstream when found.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: PaymentCodeId) -> Result<Option<PaymentCode>, AppError> {
        let Some(code) = self.repo.get_payment_code(id).await? else {
            return Ok(None);
        };

        self.notifier.notify(&code).await?;
        Ok(Some(code))
    }

    /// Moves every ACTIVE code whose expiration date is at or before `now`
    /// to EXPIRED.
    ///
    /// Updates run one at a time in the order the repository returned the
    /// ids. The first failure stops the sweep and is returned; codes already
    /// updated stay EXPIRED.
    #[tracing::instrument(skip(self))]
    pub async fn expire_past_due(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        let ids = self.repo.get_ids_expiring_by(now).await?;
        if ids.is_empty() {
            return Ok(());
        }

        info!(count = ids.len(), "expiring past-due payment codes");
        for (done, id) in ids.iter().enumerate() {
            if let Err(e) = self
                .repo
                .update_payment_code_status(*id, PaymentCodeStatus::Expired)
                .await
            {
                warn!(%id, expired = done, remaining = ids.len() - done, error = %e, "sweep aborted");
                return Err(e.into());
            }
        }

        Ok(())
    }
}
