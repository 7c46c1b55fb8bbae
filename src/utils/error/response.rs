//! HTTP response handling for errors

use super::types::StorefrontError;
use crate::auth::invitation::InvitationError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl StorefrontError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            StorefrontError::Auth(_) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", self.to_string()),
            StorefrontError::Authorization(_) => (
                StatusCode::FORBIDDEN,
                "AUTHORIZATION_ERROR",
                self.to_string(),
            ),
            StorefrontError::Invitation(invitation_error) => {
                let status = match invitation_error {
                    InvitationError::NotFound => StatusCode::NOT_FOUND,
                    InvitationError::Expired | InvitationError::Revoked => StatusCode::GONE,
                    InvitationError::AlreadyUsed => StatusCode::CONFLICT,
                    InvitationError::InviterNotPermitted { .. } => StatusCode::FORBIDDEN,
                    InvitationError::RoleNotInvitable(_) => StatusCode::BAD_REQUEST,
                };
                (status, invitation_error.code(), invitation_error.to_string())
            }
            StorefrontError::Payment(_) => {
                (StatusCode::BAD_REQUEST, "PAYMENT_ERROR", self.to_string())
            }
            StorefrontError::GatewayNotConfigured(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PAYMENT_GATEWAY_NOT_CONFIGURED",
                self.to_string(),
            ),
            StorefrontError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            StorefrontError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            StorefrontError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", self.to_string()),
            StorefrontError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            StorefrontError::Unavailable(_) | StorefrontError::Session(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                self.to_string(),
            ),
            StorefrontError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl ResponseError for StorefrontError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
