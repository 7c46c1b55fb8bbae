//! Invitation models
//!
//! An invitation grants an elevated role to whoever redeems its token before
//! it expires. It is consumed at most once.

use super::user::{User, UserRole};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invitation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Revoked,
    Expired,
}

/// Who issued an invitation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inviter {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for Inviter {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// A tokenized offer of an elevated role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub token: String,
    pub email: String,
    pub role: UserRole,
    pub invited_by: Inviter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn new(
        token: String,
        email: impl Into<String>,
        role: UserRole,
        invited_by: Inviter,
        validity: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            email: email.into(),
            role,
            invited_by,
            message: None,
            status: InvitationStatus::Pending,
            created_at: now,
            expires_at: now + validity,
            accepted_at: None,
            accepted_by: None,
            revoked_at: None,
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message.filter(|m| !m.trim().is_empty());
        self
    }

    /// Expiry is inclusive of the boundary instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Move a lapsed pending invitation to `Expired`; returns whether it changed
    pub(crate) fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_pending() && self.is_expired_at(now) {
            self.status = InvitationStatus::Expired;
            return true;
        }
        false
    }
}
