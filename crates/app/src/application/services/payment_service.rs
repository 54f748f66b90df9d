//! Payment Watcher - polls a pending checkout until it settles
//!
//! One status request per poll interval until the backend reports a
//! terminal status, the deadline passes, or the owner cancels the watch.
//! A failed poll is logged and the next tick tries again.

use tokio_util::sync::CancellationToken;

use levelgate_domain::{PaymentId, PaymentOutcome, SessionContext};
use levelgate_ports::outbound::{ApiRequest, SleepProvider, TimeProvider};

use super::cancel::until_cancelled;
use crate::application::dto::PaymentStatusResponse;
use crate::application::{Api, ServiceError};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_WATCH_TIMEOUT_MS: u64 = 30 * 60 * 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentWatchConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for PaymentWatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_WATCH_TIMEOUT_MS,
        }
    }
}

pub struct PaymentWatcher<T: TimeProvider, S: SleepProvider> {
    api: Api,
    time: T,
    sleep: S,
    config: PaymentWatchConfig,
}

impl<T: TimeProvider, S: SleepProvider> PaymentWatcher<T, S> {
    pub fn new(api: Api, time: T, sleep: S) -> Self {
        Self::with_config(api, time, sleep, PaymentWatchConfig::default())
    }

    pub fn with_config(api: Api, time: T, sleep: S, config: PaymentWatchConfig) -> Self {
        Self {
            api,
            time,
            sleep,
            config,
        }
    }

    /// Watch a payment until it settles, times out, or is cancelled.
    pub async fn watch(
        &self,
        session: &SessionContext,
        payment_id: &PaymentId,
        cancel: &CancellationToken,
    ) -> Result<PaymentOutcome, ServiceError> {
        if payment_id.is_blank() {
            return Err(ServiceError::invalid_argument("paymentId is required"));
        }

        let deadline = self.time.now_millis().saturating_add(self.config.timeout_ms);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let request = ApiRequest::get(format!("payments/{}/status", payment_id))
                .bearer(session.token());

            let Some(result) =
                until_cancelled(cancel, self.api.get::<PaymentStatusResponse>(request)).await
            else {
                return Ok(self.cancelled(payment_id));
            };

            match result {
                Ok(response) if response.status.is_terminal() => {
                    tracing::info!(
                        payment_id = %payment_id,
                        status = ?response.status,
                        attempt,
                        "Payment settled"
                    );
                    return Ok(PaymentOutcome::Settled(response.status));
                }
                Ok(response) => {
                    tracing::debug!(
                        payment_id = %payment_id,
                        status = ?response.status,
                        attempt,
                        "Payment still pending"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        payment_id = %payment_id,
                        attempt,
                        error = %e,
                        "Payment status poll failed, will retry"
                    );
                }
            }

            if self.time.now_millis() >= deadline {
                tracing::warn!(payment_id = %payment_id, attempt, "Payment watch timed out");
                return Ok(PaymentOutcome::TimedOut);
            }

            if until_cancelled(cancel, self.sleep.sleep_ms(self.config.poll_interval_ms))
                .await
                .is_none()
            {
                return Ok(self.cancelled(payment_id));
            }
        }
    }

    fn cancelled(&self, payment_id: &PaymentId) -> PaymentOutcome {
        tracing::debug!(payment_id = %payment_id, "Payment watch cancelled");
        PaymentOutcome::Cancelled
    }
}
