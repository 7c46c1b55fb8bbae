//! Edge guard: cookie-only access check run before any handler

use super::cookie::SessionCookieCodec;
use super::decision::{AccessDecision, decide};
use super::routes::{RouteAccess, RouteTable};
use std::sync::Arc;
use tracing::debug;

/// Decides a request from its path and session cookie alone
///
/// Unreadable cookies of any kind count as no session. The guard never fails
/// and has no side effects besides the decision it returns.
#[derive(Debug, Clone)]
pub struct EdgeGuard {
    routes: Arc<RouteTable>,
    codec: Arc<SessionCookieCodec>,
    cookie_name: String,
}

impl EdgeGuard {
    pub fn new(
        routes: Arc<RouteTable>,
        codec: Arc<SessionCookieCodec>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            codec,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn evaluate(&self, path: &str, cookie: Option<&str>) -> AccessDecision {
        let rule = match self.routes.classify(path) {
            RouteAccess::Unrestricted => return AccessDecision::Allow,
            RouteAccess::Restricted(rule) => rule,
        };

        let role = cookie.and_then(|raw| match self.codec.decode(raw) {
            Ok(user) => user.map(|u| u.role),
            Err(e) => {
                debug!("Ignoring unreadable session cookie on {}: {}", path, e);
                None
            }
        });

        let decision = decide(Some(&rule.allowed), role, path);
        debug!(path, pattern = %rule.pattern, ?decision, "edge guard");
        decision
    }
}
