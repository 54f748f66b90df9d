//! Per level-view session state machine
//!
//! ```text
//! Checking ──decision──▶ AccessGranted
//!     ▲          ├──────▶ AccessDenied { reason }
//!     │          └──────▶ Error
//!     └──── retry ──────────┘
//! ```
//!
//! Denials are one state distinguished by reason, not one state per reason.

use serde::Serialize;

use crate::access::{AccessDecision, ReasonCode};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LevelViewState {
    #[default]
    Checking,
    AccessGranted {
        /// False when the grant is read-only
        interactive: bool,
    },
    AccessDenied {
        reason: ReasonCode,
        /// Preview content may still be shown behind the denial
        can_view: bool,
    },
    /// The check failed; content stays locked until the user retries
    Error,
}

impl LevelViewState {
    /// Leave `Checking` with the outcome of an access check.
    pub fn apply_decision(self, decision: &AccessDecision) -> Result<Self, DomainError> {
        if self != LevelViewState::Checking {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot apply an access decision in state {}",
                self.name()
            )));
        }

        let next = if decision.is_error() {
            LevelViewState::Error
        } else if decision.permits_viewing() {
            LevelViewState::AccessGranted {
                interactive: decision.can_interact() || decision.is_bypass(),
            }
        } else {
            LevelViewState::AccessDenied {
                reason: decision.reason().unwrap_or(ReasonCode::NoAccess),
                can_view: decision.can_view(),
            }
        };
        Ok(next)
    }

    /// Manual retry, only allowed from `Error`.
    pub fn retry(self) -> Result<Self, DomainError> {
        match self {
            LevelViewState::Error => Ok(LevelViewState::Checking),
            other => Err(DomainError::invalid_state_transition(format!(
                "retry is only allowed from error, not {}",
                other.name()
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelViewState::Checking => "checking",
            LevelViewState::AccessGranted { .. } => "accessGranted",
            LevelViewState::AccessDenied { .. } => "accessDenied",
            LevelViewState::Error => "error",
        }
    }

    /// Reason to hand to the presentation table, if any
    pub fn denial_reason(&self) -> Option<ReasonCode> {
        match self {
            LevelViewState::AccessDenied { reason, .. } => Some(*reason),
            LevelViewState::Error => Some(ReasonCode::Error),
            _ => None,
        }
    }
}
