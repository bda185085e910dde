//! Runtime selection of the payment publisher.

use async_trait::async_trait;

use paycode_repo::{HttpQueuePublisher, LogPublisher};
use paycode_types::{DeliveryError, Payment, PaymentPublisher};

/// Publisher chosen from configuration at startup.
#[derive(Clone)]
pub enum Publisher {
    Queue(HttpQueuePublisher),
    Log(LogPublisher),
}

impl Publisher {
    pub fn from_queue_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => Self::Queue(HttpQueuePublisher::new(url)),
            None => Self::Log(LogPublisher),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Queue(queue) => format!("queue at {}", queue.target_url()),
            Self::Log(_) => "log only".to_string(),
        }
    }
}

#[async_trait]
impl PaymentPublisher for Publisher {
    async fn publish(&self, payment: &Payment) -> Result<(), DeliveryError> {
        match self {
            Self::Queue(queue) => queue.publish(payment).await,
            Self::Log(log) => log.publish(payment).await,
        }
    }
}
