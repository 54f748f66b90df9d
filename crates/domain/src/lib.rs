//! levelgate domain: access decisions, sequential unlock rules, and the
//! denial messages shown for each reason code.
//!
//! Everything here is pure. Fetching lives in `levelgate-app`.

pub mod access;
pub mod error;
pub mod ids;
pub mod level;
pub mod payment;
pub mod presentation;
pub mod session;
pub mod unlock;
pub mod view_state;

pub use access::{AccessDecision, AccessSource, Plan, ReasonCode};
pub use error::DomainError;
pub use ids::{ExerciseId, LevelId, PathId, PaymentId, PlanId, UserId};
pub use level::{sort_levels, CompletedLevelSet, Level, LevelProgress};
pub use payment::{PaymentOutcome, PaymentStatus};
pub use presentation::{describe, DenialMessage, Icon, PrimaryAction, GENERIC_DENIAL};
pub use session::{SessionContext, StoredUser};
pub use unlock::{classify, resolve, LevelMap, LevelMode, UnlockMap, UnlockState};
pub use view_state::LevelViewState;
