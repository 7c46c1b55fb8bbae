//! The access decision shared by both guards

use super::routes::{RouteAccess, RouteTable};
use crate::core::models::UserRole;
use crate::core::models::user::landing_page;
use serde::Serialize;

/// Why a request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// No session, or one that could not be read
    Unauthenticated,
    /// Signed in with a role the route does not admit
    RoleMismatch,
    /// Signed in, but the account may not hold a session
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: String,
    pub reason: RedirectReason,
}

/// Outcome of an access check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectTo(Redirect),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectTo(redirect) => Some(&redirect.location),
        }
    }

    pub(crate) fn login(return_path: &str) -> Self {
        AccessDecision::RedirectTo(Redirect {
            location: login_redirect(return_path),
            reason: RedirectReason::Unauthenticated,
        })
    }

    pub(crate) fn landing(role: UserRole) -> Self {
        AccessDecision::RedirectTo(Redirect {
            location: landing_page(Some(role)).to_string(),
            reason: RedirectReason::RoleMismatch,
        })
    }
}

/// `/login?redirect=<path>` with the path form-urlencoded
pub fn login_redirect(return_path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(return_path.as_bytes()).collect();
    format!("/login?redirect={}", encoded)
}

/// Decide whether `role` may proceed to `path`
///
/// `allowed` of `None` means any authenticated role is fine. A missing role
/// always goes to login; a role outside the allowed set goes to its own
/// landing page, never to login.
pub fn decide(allowed: Option<&[UserRole]>, role: Option<UserRole>, path: &str) -> AccessDecision {
    let Some(role) = role else {
        return AccessDecision::login(path);
    };

    match allowed {
        Some(allowed) if !allowed.contains(&role) => AccessDecision::landing(role),
        _ => AccessDecision::Allow,
    }
}

impl RouteTable {
    /// Classify `path` and decide for `role` in one step
    pub fn decide(&self, path: &str, role: Option<UserRole>) -> AccessDecision {
        match self.classify(path) {
            RouteAccess::Unrestricted => AccessDecision::Allow,
            RouteAccess::Restricted(rule) => decide(Some(&rule.allowed), role, path),
        }
    }
}
