//! Access decisions reported by the backend
//!
//! An [`AccessDecision`] is the server's verdict on whether, and how, the
//! current user may consume a path, level or exercise. Decisions are produced
//! fresh on every access check and never persisted.
//!
//! Invariants enforced at construction:
//! - `can_interact` implies `can_view`
//! - `can_view` implies `has_access`, a preview source, or a bypass source
//! - a denied decision carries exactly one [`ReasonCode`]; a granted one carries none

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::PlanId;

// ============================================================================
// Reason codes
// ============================================================================

/// Why access was denied (closed set)
///
/// Drives which message and call-to-action the presentation table selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// No subscription covers this content
    NoAccess,
    /// The user's plan does not include this category
    NoCategoryAccess,
    /// The previous level has not been completed yet
    PreviousLevelNotCompleted,
    /// The level has not been unlocked yet
    LevelNotUnlocked,
    /// The user's plan does not cover this path
    PlanNotCoveringPath,
    /// Only the first lesson is available as a preview
    NotFirstLesson,
    /// Anonymous user, must log in first
    LoginRequired,
    /// The check itself failed (transport error, unreadable response)
    Error,
}

impl ReasonCode {
    pub fn all() -> &'static [ReasonCode] {
        &[
            ReasonCode::NoAccess,
            ReasonCode::NoCategoryAccess,
            ReasonCode::PreviousLevelNotCompleted,
            ReasonCode::LevelNotUnlocked,
            ReasonCode::PlanNotCoveringPath,
            ReasonCode::NotFirstLesson,
            ReasonCode::LoginRequired,
            ReasonCode::Error,
        ]
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NoAccess => "no_access",
            ReasonCode::NoCategoryAccess => "no_category_access",
            ReasonCode::PreviousLevelNotCompleted => "previous_level_not_completed",
            ReasonCode::LevelNotUnlocked => "level_not_unlocked",
            ReasonCode::PlanNotCoveringPath => "plan_not_covering_path",
            ReasonCode::NotFirstLesson => "not_first_lesson",
            ReasonCode::LoginRequired => "login_required",
            ReasonCode::Error => "error",
        }
    }

    /// Denials the user fixes by progressing rather than paying
    pub fn is_progression(&self) -> bool {
        matches!(
            self,
            ReasonCode::PreviousLevelNotCompleted | ReasonCode::LevelNotUnlocked
        )
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasonCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ReasonCode::all()
            .iter()
            .copied()
            .find(|reason| reason.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown reason code: {}", s)))
    }
}

// ============================================================================
// Decision source
// ============================================================================

/// Where a decision originated on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSource {
    Subscription,
    Category,
    Path,
    Free,
    /// Limited, read-only access (e.g. first lesson)
    Preview,
    /// Administrative override
    Admin,
    /// Sentinel bypass identifier some endpoints report instead of `admin`
    AdminBypass,
    /// Unknown source (for forward compatibility)
    #[serde(other)]
    Other,
}

impl AccessSource {
    /// Sources that short-circuit sequential gating
    pub fn is_bypass(&self) -> bool {
        matches!(self, AccessSource::Admin | AccessSource::AdminBypass)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessSource::Subscription => "subscription",
            AccessSource::Category => "category",
            AccessSource::Path => "path",
            AccessSource::Free => "free",
            AccessSource::Preview => "preview",
            AccessSource::Admin => "admin",
            AccessSource::AdminBypass => "admin_bypass",
            AccessSource::Other => "other",
        }
    }
}

impl fmt::Display for AccessSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Plans
// ============================================================================

/// A subscription offer returned alongside a denial
///
/// Opaque to the resolver; carried through so the UI can render an upsell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(alias = "_id")]
    pub id: PlanId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
}

// ============================================================================
// Decision
// ============================================================================

/// The server's verdict on a (path, level, exercise) triple
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    has_access: bool,
    can_view: bool,
    can_interact: bool,
    reason: Option<ReasonCode>,
    source: Option<AccessSource>,
    available_plans: Vec<Plan>,
}

impl AccessDecision {
    /// Build a decision from raw flags, clearing any flag that would break
    /// the invariants.
    ///
    /// A denial without a reason is given `NoAccess`; a grant drops its reason.
    pub fn new(
        has_access: bool,
        can_view: bool,
        can_interact: bool,
        reason: Option<ReasonCode>,
        source: Option<AccessSource>,
        available_plans: Vec<Plan>,
    ) -> Self {
        let viewable_source = source
            .map(|s| s == AccessSource::Preview || s.is_bypass())
            .unwrap_or(false);
        let can_view = can_view && (has_access || viewable_source);
        let can_interact = can_interact && can_view;
        let reason = if has_access {
            None
        } else {
            Some(reason.unwrap_or(ReasonCode::NoAccess))
        };

        Self {
            has_access,
            can_view,
            can_interact,
            reason,
            source,
            available_plans,
        }
    }

    /// Full access from the given source
    pub fn granted(source: AccessSource) -> Self {
        Self::new(true, true, true, None, Some(source), Vec::new())
    }

    /// Denied with a reason; nothing viewable
    pub fn denied(reason: ReasonCode) -> Self {
        Self::new(false, false, false, Some(reason), None, Vec::new())
    }

    /// The decision used whenever the check itself could not be completed.
    ///
    /// Ambiguity never grants access.
    pub fn fail_closed() -> Self {
        Self::denied(ReasonCode::Error)
    }

    pub fn has_access(&self) -> bool {
        self.has_access
    }

    pub fn can_view(&self) -> bool {
        self.can_view
    }

    pub fn can_interact(&self) -> bool {
        self.can_interact
    }

    /// Present iff access was denied
    pub fn reason(&self) -> Option<ReasonCode> {
        self.reason
    }

    pub fn source(&self) -> Option<AccessSource> {
        self.source
    }

    pub fn available_plans(&self) -> &[Plan] {
        &self.available_plans
    }

    /// True when the source short-circuits sequential gating
    pub fn is_bypass(&self) -> bool {
        self.source.map(|s| s.is_bypass()).unwrap_or(false)
    }

    /// True when content may be shown at all, read-only or not.
    ///
    /// A grant with `canView: false` shows nothing; only a bypass overrides it.
    pub fn permits_viewing(&self) -> bool {
        (self.has_access && self.can_view) || self.is_bypass()
    }

    /// True for the fail-closed decision produced by a failed check
    pub fn is_error(&self) -> bool {
        self.reason == Some(ReasonCode::Error)
    }
}
