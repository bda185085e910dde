//! Downstream signal ports.
//!
//! Invoked after a successful write. Implementations can be a message queue,
//! an HTTP endpoint, or a log line.

use crate::domain::{Payment, PaymentCode};

/// Error type for notify/publish operations.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rejected by downstream: {0}")]
    Rejected(String),
}

/// Signals an external system that a payment code was issued or read.
#[async_trait::async_trait]
pub trait PaymentCodeNotifier: Send + Sync + 'static {
    async fn notify(&self, code: &PaymentCode) -> Result<(), DeliveryError>;
}

/// Hands a recorded payment to the messaging transport for the downstream job.
#[async_trait::async_trait]
pub trait PaymentPublisher: Send + Sync + 'static {
    async fn publish(&self, payment: &Payment) -> Result<(), DeliveryError>;
}
