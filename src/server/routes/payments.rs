//! Mock payment endpoint

use crate::auth::RoleRequirement;
use crate::server::routes::{ApiResponse, require};
use crate::server::state::AppState;
use crate::services::PaymentRequest;
use crate::utils::error::Result;
use actix_web::{HttpRequest, HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/payments/process", web::post().to(process_payment));
}

pub async fn process_payment(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    let user = require(&state, &req, RoleRequirement::Authenticated)?;
    tracing::debug!("Payment requested by {}", user.id);

    let receipt = state.payments.process(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(receipt)))
}
