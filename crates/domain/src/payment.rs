//! Payment status as normalized by the backend
//!
//! The gateway's own wire format never reaches the client; the backend
//! reports one of these statuses for a pending checkout.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
    Expired,
    /// Unknown status (for forward compatibility); treated as still pending
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed
                | PaymentStatus::Failed
                | PaymentStatus::Cancelled
                | PaymentStatus::Expired
        )
    }
}

/// How a watched payment ended from the client's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentOutcome {
    /// The backend reported a terminal status
    Settled(PaymentStatus),
    /// No terminal status before the watch deadline
    TimedOut,
    /// The watcher was cancelled by its owner
    Cancelled,
}

impl PaymentOutcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentOutcome::Settled(PaymentStatus::Completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Unknown.is_terminal());
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: PaymentStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_only_completed_is_paid() {
        assert!(PaymentOutcome::Settled(PaymentStatus::Completed).is_paid());
        assert!(!PaymentOutcome::Settled(PaymentStatus::Failed).is_paid());
        assert!(!PaymentOutcome::TimedOut.is_paid());
    }
}
