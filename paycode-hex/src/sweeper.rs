//! Background expiry sweep.

use std::time::Duration;

use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument};

use paycode_types::{PaymentCodeNotifier, PaymentCodeRepository};

use crate::PaymentCodeService;

/// Periodically expires past-due payment codes.
///
/// A failed pass is logged and the next tick tries again with a fresh
/// query, so codes left ACTIVE by a partial pass are picked up later.
pub struct ExpirySweeper<R: PaymentCodeRepository, N: PaymentCodeNotifier> {
    service: PaymentCodeService<R, N>,
    period: Duration,
}

impl<R: PaymentCodeRepository, N: PaymentCodeNotifier> ExpirySweeper<R, N> {
    pub fn new(service: PaymentCodeService<R, N>, period: Duration) -> Self {
        Self { service, period }
    }

    #[instrument(skip(self), fields(period_secs = self.period.as_secs()))]
    pub async fn run(self) {
        info!("Starting expiry sweeper");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.service.expire_past_due(Utc::now()).await {
                error!("Expiry sweep failed: {}", e);
            }
        }
    }
}
