//! Session endpoints: register, login, logout, current user

use crate::auth::RoleRequirement;
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::config::Validate;
use crate::core::models::{User, UserRole};
use crate::server::routes::{ApiResponse, require};
use crate::server::state::AppState;
use crate::utils::error::{Result, StorefrontError};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Where to go after signing in, usually the login page's `redirect`
    #[serde(default)]
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    pub redirect: String,
}

/// Self-registration; always creates a customer
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    validate_password(&request.password)?;

    let user = User::new(request.name.trim(), request.email.trim(), UserRole::Customer)
        .with_password_hash(hash_password(&request.password)?);
    user.validate().map_err(StorefrontError::validation)?;

    let user = state.sessions.add_user(user)?;
    state.sessions.persist().await?;
    info!("Customer registered: {}", user.id);

    let cookie = state.session_cookie(&user)?;
    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(ApiResponse::success(SessionResponse {
            redirect: user.role.landing_page().to_string(),
            user: user.public(),
        })))
}

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();

    let Some(user) = state.sessions.find_by_email(&request.email) else {
        warn!("Login attempt for unknown email");
        return Err(StorefrontError::auth("Invalid credentials"));
    };

    let verified = match &user.password_hash {
        Some(hash) => verify_password(&request.password, hash)?,
        None => false,
    };
    if !verified {
        warn!("Login attempt with invalid password for user: {}", user.id);
        return Err(StorefrontError::auth("Invalid credentials"));
    }

    if !user.status.can_sign_in() {
        warn!("Login attempt for inactive user: {}", user.id);
        return Err(StorefrontError::authorization("Account is not active"));
    }

    let mut user = user;
    user.last_login = Some(Utc::now());
    let user = state.sessions.update_user(user)?;
    state.sessions.persist().await?;

    let redirect = request
        .redirect
        .as_deref()
        .and_then(safe_return_path)
        .filter(|path| state.routes.decide(path, Some(user.role)).is_allowed())
        .unwrap_or_else(|| user.role.landing_page())
        .to_string();

    info!("User logged in: {} ({})", user.id, user.role);
    let cookie = state.session_cookie(&user)?;
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(SessionResponse {
            user: user.public(),
            redirect,
        })))
}

pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.clear_session_cookie())
        .json(ApiResponse::success(serde_json::json!({ "redirect": "/" })))
}

pub async fn me(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let user = require(&state, &req, RoleRequirement::Authenticated)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user.public())))
}

/// Local absolute path, or nothing
pub(crate) fn safe_return_path(path: &str) -> Option<&str> {
    let local = path.starts_with('/') && !path.starts_with("//") && !path.contains('\\');
    local.then_some(path)
}
