//! HTTP route modules
//!
//! Pages answer with JSON page descriptors behind the client guard; `/api`
//! endpoints answer with [`ApiResponse`] envelopes or error JSON.

pub mod auth;
pub mod health;
pub mod invitations;
pub mod pages;
pub mod payments;
pub mod users;

use crate::auth::{ClientGuard, RoleRequirement};
use crate::core::models::{User, UserRole};
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpRequest, web};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        }
    }
}

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(pages::configure_routes)
        .service(
            web::scope("/api")
                .configure(auth::configure_routes)
                .configure(invitations::configure_routes)
                .configure(users::configure_routes)
                .configure(payments::configure_routes),
        );
}

/// Run the client guard for an API call
pub(crate) fn require(
    state: &AppState,
    req: &HttpRequest,
    requirement: RoleRequirement,
) -> Result<User> {
    ClientGuard::new(req.path())
        .require(requirement)
        .evaluate(&state.request_session(req))
        .into_api_result()
}

pub(crate) fn require_staff(state: &AppState, req: &HttpRequest) -> Result<User> {
    require(
        state,
        req,
        RoleRequirement::AnyOf(vec![UserRole::Admin, UserRole::SuperAdmin]),
    )
}
