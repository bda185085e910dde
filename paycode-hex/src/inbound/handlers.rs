//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, Request, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use paycode_types::{
    AppError, CreateInquiryRequest, CreatePaymentCodeRequest, CreatePaymentRequest, DomainError,
    PaymentCodeId, PaymentCodeNotifier, PaymentPublisher,
};

use crate::{InquiryService, PaymentCodeService, PaymentService, Store};

/// Application state shared across handlers.
pub struct AppState<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher> {
    pub payment_codes: PaymentCodeService<S, N>,
    pub inquiries: InquiryService<S>,
    pub payments: PaymentService<S, P>,
}

impl<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher> AppState<S, N, P> {
    /// Wires all three services onto one storage backend.
    pub fn new(store: S, notifier: N, publisher: P) -> Self {
        Self {
            payment_codes: PaymentCodeService::new(store.clone(), notifier),
            inquiries: InquiryService::new(store.clone()),
            payments: PaymentService::new(store, publisher),
        }
    }
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Request not found!".to_string()),
            AppError::DuplicateTransaction(_) => (
                StatusCode::BAD_REQUEST,
                "Transaction ID already used.".to_string(),
            ),
            AppError::TransactionNotFound(_) => (
                StatusCode::BAD_REQUEST,
                "Transaction ID not found.".to_string(),
            ),
            AppError::Delivery(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections (bad syntax, wrong field types,
/// missing content type) answer with the standard 400 error body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AppError::BadRequest(rejection.body_text())))?;
        Ok(Self(value))
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Catch-all for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError(AppError::NotFound("route".into()))
}

/// Issue a new payment code.
#[tracing::instrument(skip(state, req), fields(payment_code = %req.payment_code))]
pub async fn create_payment_code<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher>(
    State(state): State<Arc<AppState<S, N, P>>>,
    JsonBody(req): JsonBody<CreatePaymentCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = state.payment_codes.create(req).await?;
    Ok((StatusCode::CREATED, Json(code)))
}

/// Get payment code by ID.
#[tracing::instrument(skip(state), fields(id = %id))]
pub async fn get_payment_code<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher>(
    State(state): State<Arc<AppState<S, N, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // A malformed id can never have been issued.
    let not_found = || AppError::NotFound(format!("Payment code {}", id));

    let code_id: PaymentCodeId = id.parse().map_err(|_| not_found())?;
    let code = state
        .payment_codes
        .get(code_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(code))
}

/// Bind a transaction id to a payment code.
#[tracing::instrument(skip(state, req), fields(transaction_id = %req.transaction_id))]
pub async fn create_inquiry<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher>(
    State(state): State<Arc<AppState<S, N, P>>>,
    JsonBody(req): JsonBody<CreateInquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let inquiry = state.inquiries.create(req).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// Record a payment for a transaction id that has an inquiry.
#[tracing::instrument(skip(state, req), fields(transaction_id = %req.transaction_id))]
pub async fn create_payment<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher>(
    State(state): State<Arc<AppState<S, N, P>>>,
    JsonBody(req): JsonBody<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    if state
        .inquiries
        .get_by_transaction_id(&req.transaction_id)
        .await?
        .is_none()
    {
        return Err(DomainError::TransactionNotFound(req.transaction_id).into());
    }

    let payment = state.payments.create(req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}
