//! OpenAPI document and Swagger UI wiring.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use paycode_types::domain::{
    Inquiry, InquiryId, Payment, PaymentCode, PaymentCodeId, PaymentCodeStatus, PaymentId,
};
use paycode_types::dto::{CreateInquiryRequest, CreatePaymentCodeRequest, CreatePaymentRequest};
use utoipa::OpenApi;

// Documentation-only stand-ins for the generic handlers.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Issue a new payment code (ACTIVE, expires in 50 years)
#[utoipa::path(
    post,
    path = "/payment-codes",
    tag = "payment-codes",
    request_body = CreatePaymentCodeRequest,
    responses(
        (status = 201, description = "Payment code issued", body = PaymentCode),
        (status = 400, description = "Missing field", example = json!({"error": "field 'name' is required", "code": 400})),
        (status = 500, description = "Storage or notification failure")
    )
)]
async fn create_payment_code() {}

/// Get a payment code by ID
#[utoipa::path(
    get,
    path = "/payment-codes/{id}",
    tag = "payment-codes",
    params(
        ("id" = String, Path, description = "Payment code ID (UUID)")
    ),
    responses(
        (status = 200, description = "Payment code found", body = PaymentCode),
        (status = 404, description = "Payment code not found", example = json!({"error": "Request not found!", "code": 404}))
    )
)]
async fn get_payment_code() {}

/// Bind a transaction id to a payment code
#[utoipa::path(
    post,
    path = "/inquiries",
    tag = "inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry created", body = Inquiry),
        (status = 400, description = "Missing field or transaction id already used", example = json!({"error": "Transaction ID already used.", "code": 400}))
    )
)]
async fn create_inquiry() {}

/// Record a payment for an inquired transaction
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded and published", body = Payment),
        (status = 400, description = "Missing field or no inquiry for the transaction id", example = json!({"error": "Transaction ID not found.", "code": 400})),
        (status = 500, description = "Storage or publish failure")
    )
)]
async fn create_payment() {}

/// OpenAPI documentation for the Payment Codes API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payment Codes Service API",
        version = "1.0.0",
        description = "Issue payment codes, bind transactions to them with inquiries, and record payments.",
        license(name = "MIT"),
    ),
    paths(
        health,
        create_payment_code,
        get_payment_code,
        create_inquiry,
        create_payment,
    ),
    components(
        schemas(
            CreatePaymentCodeRequest,
            CreateInquiryRequest,
            CreatePaymentRequest,
            PaymentCode,
            PaymentCodeStatus,
            PaymentCodeId,
            Inquiry,
            InquiryId,
            Payment,
            PaymentId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payment-codes", description = "Payment code issuance and lookup"),
        (name = "inquiries", description = "Transaction binding"),
        (name = "payments", description = "Payment recording"),
    )
)]
pub struct ApiDoc;
