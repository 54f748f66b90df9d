use levelgate_domain::PaymentStatus;
use serde::Deserialize;

/// `GET /payments/{paymentId}/status`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub status: PaymentStatus,
}
