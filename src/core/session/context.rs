//! Snapshot of the session as seen by a guard

use crate::core::models::User;
use serde::Serialize;

/// Hydration state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Persisted state not loaded yet
    Uninitialized,
    Initialized,
}

/// What a guard gets to look at
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub phase: SessionPhase,
    pub current_user: Option<User>,
    /// Bumped on every store mutation
    pub revision: u64,
}

impl SessionContext {
    pub fn uninitialized() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            current_user: None,
            revision: 0,
        }
    }

    /// A hydrated context, used for per-request sessions resolved from a cookie
    pub fn initialized(current_user: Option<User>) -> Self {
        Self {
            phase: SessionPhase::Initialized,
            current_user,
            revision: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == SessionPhase::Initialized
    }
}
