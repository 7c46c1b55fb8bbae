//! Page routes
//!
//! Each page answers with a JSON page descriptor. Protected pages have
//! already passed the edge guard; they run the client guard again against the
//! live directory before building any content.

use crate::auth::{ClientGuard, GuardView, RejectionNotice};
use crate::core::models::{InvitationStatus, User, UserRole, UserStatus};
use crate::server::routes::auth::safe_return_path;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// Seconds a client should wait before retrying a page while loading
const RETRY_AFTER_SECS: &str = "1";

const ACCOUNT_DASHBOARD: &str = "/account/dashboard";
const ACCOUNT_ORDERS: &str = "/account/orders";
const ARTIST_DASHBOARD: &str = "/artist/dashboard";
const ADMIN_DASHBOARD: &str = "/dashboard";
const ADMIN_USERS: &str = "/dashboard/users";
const SUPER_ADMIN_DASHBOARD: &str = "/super-admin/dashboard";
const SUPER_ADMIN_SETTINGS: &str = "/super-admin/settings";

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/login", web::get().to(login_page))
        .route("/register", web::get().to(register_page))
        .route("/invite/{token}", web::get().to(invite_page))
        .route(ACCOUNT_DASHBOARD, web::get().to(account_dashboard))
        .route(ACCOUNT_ORDERS, web::get().to(account_orders))
        .route(ARTIST_DASHBOARD, web::get().to(artist_dashboard))
        .route(ADMIN_DASHBOARD, web::get().to(admin_dashboard))
        .route(ADMIN_USERS, web::get().to(admin_users))
        .route(SUPER_ADMIN_DASHBOARD, web::get().to(super_admin_dashboard))
        .route(SUPER_ADMIN_SETTINGS, web::get().to(super_admin_settings));
}

/// Body of every page response
#[derive(Debug, Serialize, Deserialize)]
pub struct Page {
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub data: Value,
}

impl Page {
    fn new(page: &str, user: Option<&User>, data: Value) -> Self {
        Self {
            page: page.to_string(),
            user: user.map(User::public),
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    pub invitation: Option<String>,
}

/// Render a protected page through the client guard, classified by the
/// route it is mounted on rather than the request's raw path
fn guarded_page(
    state: &AppState,
    req: &HttpRequest,
    route: &str,
    page: &str,
    content: impl FnOnce(&User) -> Value,
) -> HttpResponse {
    let guard = ClientGuard::for_route(&state.routes, route);
    let session = state.request_session(req);

    match guard.render(&session, |user| Page::new(page, Some(user), content(user))) {
        GuardView::Loading => HttpResponse::ServiceUnavailable()
            .insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS))
            .json(json!({ "page": page, "loading": true })),
        GuardView::Redirect { location, notice } => {
            debug!("Client guard redirected {} to {}", route, location);
            redirect_with_notice(state, &location, &notice)
        }
        GuardView::Content(body) => HttpResponse::Ok().json(body),
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn redirect_with_notice(state: &AppState, location: &str, notice: &RejectionNotice) -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, location))
        .cookie(state.notice_cookie(notice))
        .finish()
}

pub async fn home(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let session = state.request_session(&req);
    let user = session.current_user.as_ref();
    HttpResponse::Ok().json(Page::new(
        "home",
        user,
        json!({ "landingPage": user.map(|u| u.role.landing_page()) }),
    ))
}

/// Sign-in form; shows and clears any pending rejection notice
pub async fn login_page(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LoginQuery>,
) -> HttpResponse {
    let session = state.request_session(&req);
    if let Some(user) = session.current_user.as_ref().filter(|u| u.status.can_sign_in()) {
        return redirect(user.role.landing_page());
    }

    let notice = state.take_notice(&req);
    let return_to = query.redirect.as_deref().and_then(safe_return_path);
    let body = Page::new(
        "login",
        None,
        json!({ "redirect": return_to, "notice": notice }),
    );

    let mut response = HttpResponse::Ok();
    if notice.is_some() {
        response.cookie(state.clear_notice_cookie());
    }
    response.json(body)
}

/// Registration form, optionally prefilled from a pending invitation
pub async fn register_page(
    state: web::Data<AppState>,
    query: web::Query<RegisterQuery>,
) -> Result<HttpResponse> {
    let data = match query.invitation.as_deref() {
        Some(token) => {
            let invitation = state.invitations.pending(token)?;
            json!({
                "invitation": {
                    "token": invitation.token,
                    "email": invitation.email,
                    "role": invitation.role,
                    "invitedBy": invitation.invited_by.name,
                    "message": invitation.message,
                    "expiresAt": invitation.expires_at,
                }
            })
        }
        None => json!({ "invitation": null }),
    };
    Ok(HttpResponse::Ok().json(Page::new("register", None, data)))
}

/// Invitation link target
pub async fn invite_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let invitation = state.invitations.pending(&path.into_inner())?;
    Ok(redirect(&format!("/register?invitation={}", invitation.token)))
}

pub async fn account_dashboard(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, ACCOUNT_DASHBOARD, "account-dashboard", |user| {
        let orders = user.orders.as_deref().unwrap_or_default();
        json!({
            "landingPage": user.role.landing_page(),
            "orderCount": orders.len(),
            "recentOrders": orders.iter().rev().take(5).collect::<Vec<_>>(),
        })
    })
}

pub async fn account_orders(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, ACCOUNT_ORDERS, "account-orders", |user| {
        json!({ "orders": user.orders.clone().unwrap_or_default() })
    })
}

pub async fn artist_dashboard(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, ARTIST_DASHBOARD, "artist-dashboard", |user| {
        json!({ "sales": user.sales.clone().unwrap_or_default() })
    })
}

pub async fn admin_dashboard(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, ADMIN_DASHBOARD, "admin-dashboard", |_| {
        json!({
            "users": directory_summary(&state),
            "pendingInvitations": state.invitations.list(Some(InvitationStatus::Pending)).len(),
        })
    })
}

pub async fn admin_users(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, ADMIN_USERS, "admin-users", |_| {
        let users: Vec<User> = state.sessions.users().iter().map(User::public).collect();
        json!({ "users": users })
    })
}

pub async fn super_admin_dashboard(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, SUPER_ADMIN_DASHBOARD, "super-admin-dashboard", |_| {
        let staff: Vec<User> = state
            .sessions
            .users()
            .iter()
            .filter(|u| u.role.is_staff())
            .map(User::public)
            .collect();
        json!({
            "users": directory_summary(&state),
            "staff": staff,
            "invitations": state.invitations.list(None),
        })
    })
}

pub async fn super_admin_settings(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    guarded_page(&state, &req, SUPER_ADMIN_SETTINGS, "super-admin-settings", |_| {
        let config = state.config();
        json!({
            "session": {
                "cookieName": config.session().cookie_name,
                "maxAgeSecs": config.session().max_age_secs,
                "secure": config.session().secure,
                "acceptUnsigned": config.session().accept_unsigned,
            },
            "invitations": {
                "validityDays": config.invitations().validity_days,
            },
            "payments": {
                "gateways": state.payments.enabled_gateways(),
            },
            "protectedRoutes": state
                .routes
                .routes()
                .iter()
                .map(|rule| json!({ "pattern": rule.pattern.as_str(), "allowed": rule.allowed }))
                .collect::<Vec<_>>(),
        })
    })
}

/// User counts by role and status
fn directory_summary(state: &AppState) -> Value {
    let by_role: serde_json::Map<String, Value> = UserRole::ALL
        .iter()
        .map(|role| (role.as_str().to_string(), json!(state.sessions.users_by_role(*role).len())))
        .collect();
    let by_status: serde_json::Map<String, Value> = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Suspended,
        UserStatus::Pending,
    ]
    .iter()
    .map(|status| {
        (
            format!("{:?}", status).to_ascii_lowercase(),
            json!(state.sessions.users_by_status(*status).len()),
        )
    })
    .collect();

    json!({
        "total": state.sessions.user_count(),
        "byRole": by_role,
        "byStatus": by_status,
    })
}
