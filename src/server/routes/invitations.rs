//! Invitation endpoints

use crate::auth::{NewInvitation, Registration};
use crate::core::models::{Invitation, InvitationStatus};
use crate::server::routes::auth::SessionResponse;
use crate::server::routes::{ApiResponse, require_staff};
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invitations")
            .route("", web::post().to(create_invitation))
            .route("", web::get().to(list_invitations))
            .route("/{token}", web::get().to(get_invitation))
            .route("/{token}", web::delete().to(revoke_invitation))
            .route("/{token}/accept", web::post().to(accept_invitation)),
    );
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitation {
    pub invitation: Invitation,
    /// Link to send to the invitee
    pub accept_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<InvitationStatus>,
}

pub async fn create_invitation(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<NewInvitation>,
) -> Result<HttpResponse> {
    let inviter = require_staff(&state, &req)?;
    let invitation = state.invitations.create(&inviter, request.into_inner())?;

    let accept_url = format!("/invite/{}", invitation.token);
    Ok(HttpResponse::Created().json(ApiResponse::success(CreatedInvitation {
        invitation,
        accept_url,
    })))
}

pub async fn list_invitations(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    require_staff(&state, &req)?;
    let invitations = state.invitations.list(query.status);
    let total = invitations.len();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(
        invitations,
        serde_json::json!({ "total": total }),
    )))
}

/// Public lookup used by the invite page; only pending invitations resolve
pub async fn get_invitation(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let invitation = state.invitations.pending(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitation)))
}

pub async fn revoke_invitation(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = require_staff(&state, &req)?;
    let invitation = state.invitations.revoke(&path.into_inner(), &user)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitation)))
}

/// Redeem an invitation and sign the invitee in
pub async fn accept_invitation(
    state: web::Data<AppState>,
    path: web::Path<String>,
    registration: web::Json<Registration>,
) -> Result<HttpResponse> {
    let user = state
        .invitations
        .accept(&path.into_inner(), registration.into_inner())?;
    state.sessions.persist().await?;
    info!("Signed in invited user {} as {}", user.id, user.role);

    let cookie = state.session_cookie(&user)?;
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(SessionResponse {
            redirect: user.role.landing_page().to_string(),
            user: user.public(),
        })))
}
