//! Service unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Months, Utc};
    use rust_decimal::Decimal;

    use paycode_types::{
        AppError, CreateInquiryRequest, CreatePaymentCodeRequest, CreatePaymentRequest,
        DeliveryError, DomainError, Inquiry, InquiryRepository, Payment, PaymentCode,
        PaymentCodeId, PaymentCodeNotifier, PaymentCodeRepository, PaymentCodeStatus,
        PaymentPublisher, PaymentRepository, RepoError,
    };

    use crate::{InquiryService, PaymentCodeService, PaymentService};

    #[derive(Default)]
    struct MockState {
        codes: HashMap<PaymentCodeId, PaymentCode>,
        inquiries: Vec<Inquiry>,
        payments: Vec<Payment>,
        /// Scripted answer for `get_ids_expiring_by`.
        expiring: Vec<PaymentCodeId>,
        status_updates: Vec<(PaymentCodeId, PaymentCodeStatus)>,
        inquiry_inserts: usize,
        fail_writes: bool,
        fail_update_for: Option<PaymentCodeId>,
        /// Lookups miss even when a row exists, as a concurrent writer would see.
        blind_lookup: bool,
    }

    /// Recording in-memory repository for testing the service layer.
    #[derive(Clone, Default)]
    pub struct MockRepo {
        state: Arc<Mutex<MockState>>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self::default()
        }

        fn failing_writes() -> Self {
            let repo = Self::new();
            repo.state.lock().unwrap().fail_writes = true;
            repo
        }

        fn with_expiring(ids: Vec<PaymentCodeId>) -> Self {
            let repo = Self::new();
            repo.state.lock().unwrap().expiring = ids;
            repo
        }

        fn status_updates(&self) -> Vec<(PaymentCodeId, PaymentCodeStatus)> {
            self.state.lock().unwrap().status_updates.clone()
        }
    }

    fn write_error() -> RepoError {
        RepoError::Database("connection refused".into())
    }

    #[async_trait]
    impl PaymentCodeRepository for MockRepo {
        async fn create_payment_code(&self, code: &PaymentCode) -> Result<(), RepoError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_writes {
                return Err(write_error());
            }
            state.codes.insert(code.id, code.clone());
            Ok(())
        }

        async fn get_payment_code(
            &self,
            id: PaymentCodeId,
        ) -> Result<Option<PaymentCode>, RepoError> {
            Ok(self.state.lock().unwrap().codes.get(&id).cloned())
        }

        async fn get_ids_expiring_by(
            &self,
            _instant: DateTime<Utc>,
        ) -> Result<Vec<PaymentCodeId>, RepoError> {
            Ok(self.state.lock().unwrap().expiring.clone())
        }

        async fn update_payment_code_status(
            &self,
            id: PaymentCodeId,
            status: PaymentCodeStatus,
        ) -> Result<(), RepoError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_update_for == Some(id) {
                return Err(write_error());
            }
            state.status_updates.push((id, status));
            Ok(())
        }
    }

    #[async_trait]
    impl InquiryRepository for MockRepo {
        async fn create_inquiry(&self, inquiry: &Inquiry) -> Result<(), RepoError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_writes {
                return Err(write_error());
            }
            state.inquiry_inserts += 1;
            if state
                .inquiries
                .iter()
                .any(|i| i.transaction_id == inquiry.transaction_id)
            {
                return Err(DomainError::DuplicateTransaction(inquiry.transaction_id.clone()).into());
            }
            state.inquiries.push(inquiry.clone());
            Ok(())
        }

        async fn get_inquiry_by_transaction_id(
            &self,
            transaction_id: &str,
        ) -> Result<Option<Inquiry>, RepoError> {
            let state = self.state.lock().unwrap();
            if state.blind_lookup {
                return Ok(None);
            }
            Ok(state
                .inquiries
                .iter()
                .find(|i| i.transaction_id == transaction_id)
                .cloned())
        }
    }

    #[async_trait]
    impl PaymentRepository for MockRepo {
        async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_writes {
                return Err(write_error());
            }
            state.payments.push(payment.clone());
            Ok(())
        }
    }

    /// Records every delivered entity id; optionally fails each call.
    #[derive(Clone, Default)]
    pub struct MockDelivery {
        delivered: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MockDelivery {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, id: String) -> Result<(), DeliveryError> {
            self.delivered.lock().unwrap().push(id);
            if self.fail {
                return Err(DeliveryError::Transport("queue unavailable".into()));
            }
            Ok(())
        }

        fn delivered(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentCodeNotifier for MockDelivery {
        async fn notify(&self, code: &PaymentCode) -> Result<(), DeliveryError> {
            self.record(code.id.to_string())
        }
    }

    #[async_trait]
    impl PaymentPublisher for MockDelivery {
        async fn publish(&self, payment: &Payment) -> Result<(), DeliveryError> {
            self.record(payment.id.to_string())
        }
    }

    fn code_request() -> CreatePaymentCodeRequest {
        CreatePaymentCodeRequest {
            payment_code: "PC-001".to_string(),
            name: "Coffee beans".to_string(),
        }
    }

    fn inquiry_request(transaction_id: &str) -> CreateInquiryRequest {
        CreateInquiryRequest {
            transaction_id: transaction_id.to_string(),
            payment_code: "PC-001".to_string(),
            amount: Some(Decimal::from_str("150000.00").unwrap()),
        }
    }

    fn payment_request(transaction_id: &str) -> CreatePaymentRequest {
        CreatePaymentRequest {
            transaction_id: transaction_id.to_string(),
            payment_code: "PC-001".to_string(),
            name: "Alice".to_string(),
            amount: "150000".to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payment code lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_payment_code_success() {
        let notifier = MockDelivery::default();
        let service = PaymentCodeService::new(MockRepo::new(), notifier.clone());

        let code = service.create(code_request()).await.unwrap();

        assert_eq!(code.status, PaymentCodeStatus::Active);
        assert_eq!(code.payment_code, "PC-001");
        assert_eq!(code.created_at, code.updated_at);
        assert_eq!(
            Some(code.expiration_date),
            code.created_at.checked_add_months(Months::new(600))
        );
        assert_eq!(notifier.delivered(), vec![code.id.to_string()]);
    }

    #[tokio::test]
    async fn test_create_payment_code_repo_failure_skips_notify() {
        let notifier = MockDelivery::default();
        let service = PaymentCodeService::new(MockRepo::failing_writes(), notifier.clone());

        let result = service.create(code_request()).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(notifier.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_code_notify_failure_keeps_row() {
        let repo = MockRepo::new();
        let service = PaymentCodeService::new(repo.clone(), MockDelivery::failing());

        let result = service.create(code_request()).await;

        assert!(matches!(result, Err(AppError::Delivery(_))));
        assert_eq!(repo.state.lock().unwrap().codes.len(), 1);
    }

    #[tokio::test]
    async fn test_create_payment_code_blank_name_fails() {
        let repo = MockRepo::new();
        let service = PaymentCodeService::new(repo.clone(), MockDelivery::default());

        let result = service
            .create(CreatePaymentCodeRequest {
                payment_code: "PC-001".to_string(),
                name: "   ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "field 'name' is required"));
        assert!(repo.state.lock().unwrap().codes.is_empty());
    }

    #[tokio::test]
    async fn test_get_payment_code_round_trip() {
        let notifier = MockDelivery::default();
        let service = PaymentCodeService::new(MockRepo::new(), notifier.clone());

        let created = service.create(code_request()).await.unwrap();
        let fetched = service.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.payment_code, created.payment_code);
        assert_eq!(fetched.name, created.name);
        assert_eq!(notifier.delivered().len(), 2);
    }

    #[tokio::test]
    async fn test_get_payment_code_twice_is_stable() {
        let service = PaymentCodeService::new(MockRepo::new(), MockDelivery::default());
        let created = service.create(code_request()).await.unwrap();

        let first = service.get(created.id).await.unwrap();
        let second = service.get(created.id).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_payment_code_not_found_skips_notify() {
        let notifier = MockDelivery::default();
        let service = PaymentCodeService::new(MockRepo::new(), notifier.clone());

        let result = service.get(PaymentCodeId::new()).await.unwrap();

        assert!(result.is_none());
        assert!(notifier.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_get_payment_code_notify_failure_surfaces() {
        let repo = MockRepo::new();
        let code = PaymentCode::issue("PC-1".into(), "Tea".into(), Utc::now()).unwrap();
        repo.create_payment_code(&code).await.unwrap();
        let service = PaymentCodeService::new(repo, MockDelivery::failing());

        let result = service.get(code.id).await;

        assert!(matches!(result, Err(AppError::Delivery(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expiry sweep
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_expire_updates_every_id_in_order() {
        let (a, b) = (PaymentCodeId::new(), PaymentCodeId::new());
        let repo = MockRepo::with_expiring(vec![a, b]);
        let service = PaymentCodeService::new(repo.clone(), MockDelivery::default());

        service.expire_past_due(Utc::now()).await.unwrap();

        assert_eq!(
            repo.status_updates(),
            vec![
                (a, PaymentCodeStatus::Expired),
                (b, PaymentCodeStatus::Expired)
            ]
        );
    }

    #[tokio::test]
    async fn test_expire_failure_on_second_keeps_first() {
        let (a, b) = (PaymentCodeId::new(), PaymentCodeId::new());
        let repo = MockRepo::with_expiring(vec![a, b]);
        repo.state.lock().unwrap().fail_update_for = Some(b);
        let service = PaymentCodeService::new(repo.clone(), MockDelivery::default());

        let result = service.expire_past_due(Utc::now()).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(repo.status_updates(), vec![(a, PaymentCodeStatus::Expired)]);
    }

    #[tokio::test]
    async fn test_expire_failure_on_first_aborts_rest() {
        let (a, b) = (PaymentCodeId::new(), PaymentCodeId::new());
        let repo = MockRepo::with_expiring(vec![a, b]);
        repo.state.lock().unwrap().fail_update_for = Some(a);
        let service = PaymentCodeService::new(repo.clone(), MockDelivery::default());

        assert!(service.expire_past_due(Utc::now()).await.is_err());
        assert!(repo.status_updates().is_empty());
    }

    #[tokio::test]
    async fn test_expire_with_nothing_due_is_noop() {
        let repo = MockRepo::new();
        let notifier = MockDelivery::default();
        let service = PaymentCodeService::new(repo.clone(), notifier.clone());

        service.expire_past_due(Utc::now()).await.unwrap();

        assert!(repo.status_updates().is_empty());
        assert!(notifier.delivered().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inquiry binding
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_inquiry_success() {
        let service = InquiryService::new(MockRepo::new());

        let inquiry = service.create(inquiry_request("TRX-1")).await.unwrap();

        assert!(!inquiry.id.to_string().is_empty());
        assert_eq!(inquiry.transaction_id, "TRX-1");
        assert_eq!(inquiry.created_at, inquiry.updated_at);
    }

    #[tokio::test]
    async fn test_create_inquiry_duplicate_skips_insert() {
        let repo = MockRepo::new();
        let service = InquiryService::new(repo.clone());
        service.create(inquiry_request("TRX-1")).await.unwrap();

        let result = service.create(inquiry_request("TRX-1")).await;

        assert!(matches!(result, Err(AppError::DuplicateTransaction(id)) if id == "TRX-1"));
        assert_eq!(repo.state.lock().unwrap().inquiry_inserts, 1);
    }

    #[tokio::test]
    async fn test_create_inquiry_race_resolved_by_storage() {
        let repo = MockRepo::new();
        let service = InquiryService::new(repo.clone());
        service.create(inquiry_request("TRX-1")).await.unwrap();
        repo.state.lock().unwrap().blind_lookup = true;

        let result = service.create(inquiry_request("TRX-1")).await;

        assert!(matches!(result, Err(AppError::DuplicateTransaction(_))));
        assert_eq!(repo.state.lock().unwrap().inquiries.len(), 1);
    }

    #[tokio::test]
    async fn test_create_inquiry_missing_amount_fails() {
        let service = InquiryService::new(MockRepo::new());

        let result = service
            .create(CreateInquiryRequest {
                amount: None,
                ..inquiry_request("TRX-1")
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_inquiry_by_transaction_id() {
        let service = InquiryService::new(MockRepo::new());
        let created = service.create(inquiry_request("TRX-1")).await.unwrap();

        let first = service.get_by_transaction_id("TRX-1").await.unwrap();
        let second = service.get_by_transaction_id("TRX-1").await.unwrap();

        assert_eq!(first.as_ref().map(|i| i.id), Some(created.id));
        assert_eq!(first, second);
        assert!(service.get_by_transaction_id("TRX-2").await.unwrap().is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payment recording
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_payment_publishes() {
        let publisher = MockDelivery::default();
        let service = PaymentService::new(MockRepo::new(), publisher.clone());

        let payment = service.create(payment_request("TRX-1")).await.unwrap();

        assert_eq!(payment.transaction_id, "TRX-1");
        assert_eq!(payment.created_at, payment.updated_at);
        assert_eq!(publisher.delivered(), vec![payment.id.to_string()]);
    }

    #[tokio::test]
    async fn test_create_payment_repo_failure_skips_publish() {
        let publisher = MockDelivery::default();
        let service = PaymentService::new(MockRepo::failing_writes(), publisher.clone());

        let result = service.create(payment_request("TRX-1")).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(publisher.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_publish_failure_keeps_row() {
        let repo = MockRepo::new();
        let service = PaymentService::new(repo.clone(), MockDelivery::failing());

        let result = service.create(payment_request("TRX-1")).await;

        assert!(matches!(result, Err(AppError::Delivery(_))));
        assert_eq!(repo.state.lock().unwrap().payments.len(), 1);
    }
}
