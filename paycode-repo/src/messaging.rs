//! Outbound delivery adapters for the notifier and publisher ports.

use async_trait::async_trait;
use tracing::{info, instrument};

use paycode_types::{DeliveryError, Payment, PaymentCode, PaymentCodeNotifier, PaymentPublisher};

/// Publishes each payment as a JSON POST to a queue ingestion endpoint.
#[derive(Clone)]
pub struct HttpQueuePublisher {
    client: reqwest::Client,
    target_url: String,
}

impl HttpQueuePublisher {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            target_url: target_url.into(),
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

#[async_trait]
impl PaymentPublisher for HttpQueuePublisher {
    #[instrument(skip(self, payment), fields(payment_id = %payment.id, target = %self.target_url))]
    async fn publish(&self, payment: &Payment) -> Result<(), DeliveryError> {
        let body =
            serde_json::to_vec(payment).map_err(|e| DeliveryError::Serialization(e.to_string()))?;

        let resp = self
            .client
            .post(&self.target_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DeliveryError::Rejected(format!("HTTP {}", resp.status())));
        }

        info!("payment published");
        Ok(())
    }
}

/// Notifier that only records a tracing event.
#[derive(Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl PaymentCodeNotifier for LogNotifier {
    async fn notify(&self, code: &PaymentCode) -> Result<(), DeliveryError> {
        info!(
            payment_code_id = %code.id,
            payment_code = %code.payment_code,
            status = %code.status,
            "payment code notification"
        );
        Ok(())
    }
}

/// Publisher used when no queue is configured; logs the payment and succeeds.
#[derive(Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl PaymentPublisher for LogPublisher {
    async fn publish(&self, payment: &Payment) -> Result<(), DeliveryError> {
        info!(
            payment_id = %payment.id,
            transaction_id = %payment.transaction_id,
            "payment recorded (no queue configured)"
        );
        Ok(())
    }
}
