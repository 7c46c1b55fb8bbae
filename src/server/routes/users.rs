//! User directory endpoints for staff

use crate::auth::RoleRequirement;
use crate::core::models::{User, UserRole, UserStatus};
use crate::server::routes::{ApiResponse, require, require_staff};
use crate::server::state::AppState;
use crate::utils::error::{Result, StorefrontError};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/status", web::patch().to(update_status)),
    );
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub role: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: UserStatus,
}

pub async fn list_users(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    require_staff(&state, &req)?;

    let role = query
        .role
        .as_deref()
        .map(str::parse::<UserRole>)
        .transpose()
        .map_err(StorefrontError::bad_request)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<UserStatus>)
        .transpose()
        .map_err(StorefrontError::bad_request)?;

    let mut users: Vec<User> = state
        .sessions
        .users()
        .into_iter()
        .filter(|user| role.is_none_or(|r| user.role == r))
        .filter(|user| status.is_none_or(|s| user.status == s))
        .map(|user| user.public())
        .collect();
    users.sort_by(|a, b| a.join_date.cmp(&b.join_date));

    let total = users.len();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(
        users,
        serde_json::json!({ "total": total }),
    )))
}

/// Staff may view anyone; everyone else only themselves
pub async fn get_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let viewer = require(&state, &req, RoleRequirement::Authenticated)?;
    let id = path.into_inner();

    if viewer.id != id && !viewer.role.is_staff() {
        return Err(StorefrontError::authorization(
            "You can only view your own account",
        ));
    }

    let user = state
        .sessions
        .get_user(id)
        .ok_or_else(|| StorefrontError::not_found(format!("User not found: {}", id)))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user.public())))
}

pub async fn update_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    update: web::Json<StatusUpdate>,
) -> Result<HttpResponse> {
    let actor = require_staff(&state, &req)?;
    let mut user = managed_user(&state, &actor, path.into_inner())?;

    user.status = update.status;
    let user = state.sessions.update_user(user)?;
    state.sessions.persist().await?;

    info!("User {} set to {:?} by {}", user.id, user.status, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(user.public())))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let actor = require_staff(&state, &req)?;
    let user = managed_user(&state, &actor, path.into_inner())?;

    let removed = state.sessions.delete_user(user.id)?;
    state.sessions.persist().await?;

    info!("User {} deleted by {}", removed.id, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(removed.public())))
}

/// Look up a user the actor is allowed to manage
///
/// Nobody manages their own account here, and only a super-admin manages staff.
fn managed_user(state: &AppState, actor: &User, id: Uuid) -> Result<User> {
    if actor.id == id {
        return Err(StorefrontError::authorization(
            "You cannot change your own account",
        ));
    }

    let user = state
        .sessions
        .get_user(id)
        .ok_or_else(|| StorefrontError::not_found(format!("User not found: {}", id)))?;

    if user.role.is_staff() && actor.role != UserRole::SuperAdmin {
        return Err(StorefrontError::authorization(
            "Only a super-admin can manage staff accounts",
        ));
    }
    Ok(user)
}
