//! Error types for the storefront gate

use crate::auth::invitation::InvitationError;
use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Main error type
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Authenticated but not permitted
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Session store lifecycle violations
    #[error("Session error: {0}")]
    Session(String),

    /// Invitation token failures
    #[error(transparent)]
    Invitation(#[from] InvitationError),

    /// Payment gateway failures
    #[error("Payment error: {0}")]
    Payment(String),

    /// Payment gateway known but not enabled
    #[error("Payment gateway not configured: {0}")]
    GatewayNotConfigured(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Cryptographic errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Service not ready yet
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
