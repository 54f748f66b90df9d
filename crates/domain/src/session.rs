//! Session identity
//!
//! The explicit session context handed to every fetcher. Nothing reads the
//! token or user id from a global; whoever loads the session passes it down.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// User profile as cached by the login flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
    user_id: Option<UserId>,
    user: Option<StoredUser>,
}

impl SessionContext {
    /// Session for a visitor who has not logged in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Blank tokens and ids are dropped; when no explicit user id is given
    /// the stored user's id is used.
    pub fn new(token: Option<String>, user_id: Option<UserId>, user: Option<StoredUser>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        let user_id = user_id
            .filter(|id| !id.is_blank())
            .or_else(|| user.as_ref().map(|u| u.id.clone()))
            .filter(|id| !id.is_blank());
        Self {
            token,
            user_id,
            user,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn user(&self) -> Option<&StoredUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
