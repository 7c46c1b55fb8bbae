//! Per-request session resolution and cookie construction

use super::state::AppState;
use crate::auth::{NoticeKind, RejectionNotice};
use crate::core::models::User;
use crate::core::session::SessionContext;
use crate::utils::error::Result;
use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use tracing::debug;

/// Lifetime of the rejection notice cookie
const NOTICE_MAX_AGE_SECS: i64 = 60;

impl AppState {
    /// Session for this request: the cookie names a user, the directory says
    /// who they are now
    pub fn request_session(&self, req: &HttpRequest) -> SessionContext {
        if !self.sessions.is_initialized() {
            return SessionContext::uninitialized();
        }

        let claimed = req
            .cookie(&self.config.session().cookie_name)
            .and_then(|cookie| match self.cookies.decode(cookie.value()) {
                Ok(user) => user,
                Err(e) => {
                    debug!("Unreadable session cookie: {}", e);
                    None
                }
            });

        // Deleted users lose their session; role and status come from the directory
        let current = claimed.and_then(|user| self.sessions.get_user(user.id));
        SessionContext::initialized(current)
    }

    pub fn session_cookie(&self, user: &User) -> Result<Cookie<'static>> {
        let session = self.config.session();
        let value = self.cookies.encode(user)?;

        Ok(Cookie::build(session.cookie_name.clone(), value)
            .path("/")
            .http_only(true)
            .secure(session.secure)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(session.max_age_secs as i64))
            .finish())
    }

    pub fn clear_session_cookie(&self) -> Cookie<'static> {
        removal_cookie(self.config.session().cookie_name.clone())
    }

    pub fn notice_cookie(&self, notice: &RejectionNotice) -> Cookie<'static> {
        Cookie::build(
            self.config.session().notice_cookie_name.clone(),
            notice.kind.as_str(),
        )
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(NOTICE_MAX_AGE_SECS))
        .finish()
    }

    pub fn clear_notice_cookie(&self) -> Cookie<'static> {
        removal_cookie(self.config.session().notice_cookie_name.clone())
    }

    /// Pending notice left by a guard redirect, if any
    pub fn take_notice(&self, req: &HttpRequest) -> Option<RejectionNotice> {
        req.cookie(&self.config.session().notice_cookie_name)
            .and_then(|cookie| cookie.value().parse::<NoticeKind>().ok())
            .map(RejectionNotice::new)
    }
}

fn removal_cookie(name: String) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}
