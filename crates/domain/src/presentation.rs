//! Denial presentation table
//!
//! Maps a [`ReasonCode`] to the message and call-to-action shown on a locked
//! level. This is the only place monetization gating lives: progression
//! denials send the user back, anonymous users are asked to log in, and every
//! other denial is an upsell.

use serde::Serialize;

use crate::access::ReasonCode;

/// The call-to-action button shown with a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryAction {
    Subscribe,
    Login,
    GoBack,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Lock,
    Crown,
    User,
    Stairs,
    Warning,
}

/// What the UI renders for a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenialMessage {
    pub icon: Icon,
    pub title: &'static str,
    pub body: &'static str,
    pub primary_action: PrimaryAction,
}

/// Fallback for an absent or unmapped reason
pub const GENERIC_DENIAL: DenialMessage = DenialMessage {
    icon: Icon::Lock,
    title: "Access denied",
    body: "You don't have access to this content.",
    primary_action: PrimaryAction::Subscribe,
};

static DENIALS: &[(ReasonCode, DenialMessage)] = &[
    (
        ReasonCode::NoAccess,
        DenialMessage {
            icon: Icon::Crown,
            title: "Premium content",
            body: "Subscribe to unlock this content.",
            primary_action: PrimaryAction::Subscribe,
        },
    ),
    (
        ReasonCode::NoCategoryAccess,
        DenialMessage {
            icon: Icon::Crown,
            title: "Category not included",
            body: "Your subscription does not include this category.",
            primary_action: PrimaryAction::Subscribe,
        },
    ),
    (
        ReasonCode::PlanNotCoveringPath,
        DenialMessage {
            icon: Icon::Crown,
            title: "Path not included",
            body: "Your current plan does not cover this path. Upgrade to continue.",
            primary_action: PrimaryAction::Subscribe,
        },
    ),
    (
        ReasonCode::NotFirstLesson,
        DenialMessage {
            icon: Icon::Lock,
            title: "Preview limit reached",
            body: "Only the first lesson is free. Subscribe to keep going.",
            primary_action: PrimaryAction::Subscribe,
        },
    ),
    (
        ReasonCode::PreviousLevelNotCompleted,
        DenialMessage {
            icon: Icon::Stairs,
            title: "Finish the previous level",
            body: "Complete every exercise of the previous level to unlock this one.",
            primary_action: PrimaryAction::GoBack,
        },
    ),
    (
        ReasonCode::LevelNotUnlocked,
        DenialMessage {
            icon: Icon::Stairs,
            title: "Level locked",
            body: "This level is not unlocked yet. Keep progressing through the path.",
            primary_action: PrimaryAction::GoBack,
        },
    ),
    (
        ReasonCode::LoginRequired,
        DenialMessage {
            icon: Icon::User,
            title: "Sign in required",
            body: "Log in to access this content.",
            primary_action: PrimaryAction::Login,
        },
    ),
    (
        ReasonCode::Error,
        DenialMessage {
            icon: Icon::Warning,
            title: "Something went wrong",
            body: "We couldn't verify your access. Please try again.",
            primary_action: PrimaryAction::Subscribe,
        },
    ),
];

/// Look up the message for a denial reason.
pub fn describe(reason: Option<ReasonCode>) -> &'static DenialMessage {
    reason
        .and_then(|reason| {
            DENIALS
                .iter()
                .find(|(code, _)| *code == reason)
                .map(|(_, message)| message)
        })
        .unwrap_or(&GENERIC_DENIAL)
}
