//! Client guard: in-handler check against a live session
//!
//! Where the edge guard only sees a cookie, this guard sees the session
//! context: whether the store has been hydrated, and the current user as the
//! directory knows them now. Nothing guarded is rendered until the outcome is
//! [`GuardOutcome::Authorized`].

use super::decision::{AccessDecision, RedirectReason, decide, login_redirect};
use super::routes::{RouteAccess, RouteTable};
use crate::core::models::{User, UserRole};
use crate::core::session::SessionContext;
use crate::utils::error::{Result, StorefrontError};
use serde::Serialize;

/// Which roles a guarded section admits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any signed-in user
    Authenticated,
    One(UserRole),
    AnyOf(Vec<UserRole>),
}

impl RoleRequirement {
    /// Requirement from role names, compared case-insensitively
    pub fn named<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let roles = names
            .iter()
            .map(|name| name.as_ref().parse::<UserRole>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorefrontError::validation)?;

        Ok(match roles.as_slice() {
            [] => RoleRequirement::Authenticated,
            [role] => RoleRequirement::One(*role),
            _ => RoleRequirement::AnyOf(roles),
        })
    }

    fn allowed(&self) -> Option<&[UserRole]> {
        match self {
            RoleRequirement::Authenticated => None,
            RoleRequirement::One(role) => Some(std::slice::from_ref(role)),
            RoleRequirement::AnyOf(roles) => Some(roles),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    SignInRequired,
    Forbidden,
    AccountInactive,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::SignInRequired => "sign_in_required",
            NoticeKind::Forbidden => "forbidden",
            NoticeKind::AccountInactive => "account_inactive",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            NoticeKind::SignInRequired => "Please sign in to continue",
            NoticeKind::Forbidden => "You do not have permission to view that page",
            NoticeKind::AccountInactive => "Your account is not active",
        }
    }
}

impl std::str::FromStr for NoticeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sign_in_required" => Ok(NoticeKind::SignInRequired),
            "forbidden" => Ok(NoticeKind::Forbidden),
            "account_inactive" => Ok(NoticeKind::AccountInactive),
            _ => Err(format!("Unknown notice: {}", s)),
        }
    }
}

/// User-facing message attached to a rejection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl RejectionNotice {
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }

    fn for_reason(reason: RedirectReason) -> Self {
        Self::new(match reason {
            RedirectReason::Unauthenticated => NoticeKind::SignInRequired,
            RedirectReason::RoleMismatch => NoticeKind::Forbidden,
            RedirectReason::Inactive => NoticeKind::AccountInactive,
        })
    }
}

/// Result of running the client guard
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Session not hydrated yet; render nothing
    Loading,
    Redirect {
        location: String,
        reason: RedirectReason,
        notice: RejectionNotice,
    },
    Authorized(User),
}

impl GuardOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardOutcome::Authorized(_))
    }

    /// Map to an API result: unauthenticated is 401, everything else 403
    pub fn into_api_result(self) -> Result<User> {
        match self {
            GuardOutcome::Authorized(user) => Ok(user),
            GuardOutcome::Loading => Err(StorefrontError::unavailable("session is loading")),
            GuardOutcome::Redirect { reason, notice, .. } => match reason {
                RedirectReason::Unauthenticated => Err(StorefrontError::auth(notice.message)),
                RedirectReason::RoleMismatch | RedirectReason::Inactive => {
                    Err(StorefrontError::authorization(notice.message))
                }
            },
        }
    }
}

/// What a guarded section turns into
#[derive(Debug, Clone, PartialEq)]
pub enum GuardView<T> {
    Loading,
    Redirect {
        location: String,
        notice: RejectionNotice,
    },
    Content(T),
}

/// Guard for one page or section
#[derive(Debug, Clone)]
pub struct ClientGuard {
    requirement: RoleRequirement,
    return_path: String,
}

impl ClientGuard {
    /// Admit any signed-in user; `return_path` is where login sends them back
    pub fn new(return_path: impl Into<String>) -> Self {
        Self {
            requirement: RoleRequirement::Authenticated,
            return_path: return_path.into(),
        }
    }

    /// Use the protected-route rule for `path`, as the edge guard would
    pub fn for_route(routes: &RouteTable, path: &str) -> Self {
        let requirement = match routes.classify(path) {
            RouteAccess::Unrestricted => RoleRequirement::Authenticated,
            RouteAccess::Restricted(rule) => RoleRequirement::AnyOf(rule.allowed.clone()),
        };
        Self {
            requirement,
            return_path: path.to_string(),
        }
    }

    pub fn require(mut self, requirement: RoleRequirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn require_role(self, role: UserRole) -> Self {
        self.require(RoleRequirement::One(role))
    }

    pub fn require_any(self, roles: &[UserRole]) -> Self {
        self.require(RoleRequirement::AnyOf(roles.to_vec()))
    }

    /// Require a role given by name, e.g. `"admin"` or `"Super-Admin"`
    pub fn require_named(self, name: &str) -> Result<Self> {
        Ok(self.require(RoleRequirement::named(&[name])?))
    }

    pub fn requirement(&self) -> &RoleRequirement {
        &self.requirement
    }

    pub fn evaluate(&self, session: &SessionContext) -> GuardOutcome {
        if !session.is_initialized() {
            return GuardOutcome::Loading;
        }

        if let Some(user) = &session.current_user {
            if !user.status.can_sign_in() {
                return GuardOutcome::Redirect {
                    location: login_redirect(&self.return_path),
                    reason: RedirectReason::Inactive,
                    notice: RejectionNotice::for_reason(RedirectReason::Inactive),
                };
            }
        }

        let role = session.current_user.as_ref().map(|u| u.role);
        match decide(self.requirement.allowed(), role, &self.return_path) {
            AccessDecision::Allow => match &session.current_user {
                Some(user) => GuardOutcome::Authorized(user.clone()),
                None => GuardOutcome::Redirect {
                    location: login_redirect(&self.return_path),
                    reason: RedirectReason::Unauthenticated,
                    notice: RejectionNotice::for_reason(RedirectReason::Unauthenticated),
                },
            },
            AccessDecision::RedirectTo(redirect) => GuardOutcome::Redirect {
                notice: RejectionNotice::for_reason(redirect.reason),
                location: redirect.location,
                reason: redirect.reason,
            },
        }
    }

    /// Run `children` only when authorized
    pub fn render<T>(&self, session: &SessionContext, children: impl FnOnce(&User) -> T) -> GuardView<T> {
        match self.evaluate(session) {
            GuardOutcome::Loading => GuardView::Loading,
            GuardOutcome::Redirect {
                location, notice, ..
            } => GuardView::Redirect { location, notice },
            GuardOutcome::Authorized(user) => GuardView::Content(children(&user)),
        }
    }
}
