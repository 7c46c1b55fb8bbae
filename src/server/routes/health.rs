//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: &'static str,
    pub session: crate::core::session::SessionPhase,
    pub users: usize,
}

/// Healthy once the user directory has been hydrated
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let session = state.sessions.phase();
    let status = HealthStatus {
        status: if state.sessions.is_initialized() {
            "healthy"
        } else {
            "starting"
        },
        timestamp: chrono::Utc::now(),
        version: crate::VERSION,
        session,
        users: state.sessions.user_count(),
    };

    if state.sessions.is_initialized() {
        HttpResponse::Ok().json(ApiResponse::success(status))
    } else {
        HttpResponse::ServiceUnavailable().json(ApiResponse::success(status))
    }
}
