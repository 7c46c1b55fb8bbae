//! Configuration validation

use super::models::*;
use crate::core::models::User;
use crate::services::payments::KNOWN_GATEWAYS;
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Shortest acceptable session signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

impl Validate for StorefrontConfig {
    fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.session
            .validate()
            .map_err(|e| format!("Session config error: {}", e))?;
        self.invitations
            .validate()
            .map_err(|e| format!("Invitation config error: {}", e))?;
        self.payments
            .validate()
            .map_err(|e| format!("Payment config error: {}", e))?;
        self.bootstrap
            .validate()
            .map_err(|e| format!("Bootstrap config error: {}", e))?;
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }
        if self.workers == Some(0) {
            return Err("Workers cannot be 0".to_string());
        }
        self.cors.validate()
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating session configuration");

        if self.cookie_name.trim().is_empty() {
            return Err("Cookie name cannot be empty".to_string());
        }
        if self.cookie_name == self.notice_cookie_name {
            return Err("Session and notice cookies must have different names".to_string());
        }
        if self.secret.is_empty() {
            return Err("Session secret cannot be empty".to_string());
        }
        if self.secret.len() < MIN_SECRET_LENGTH {
            return Err(format!(
                "Session secret should be at least {} characters long",
                MIN_SECRET_LENGTH
            ));
        }
        if self.max_age_secs == 0 {
            return Err("Session max age must be greater than 0".to_string());
        }
        if self.max_age_secs > 86400 * 30 {
            return Err("Session max age should not exceed 30 days".to_string());
        }
        Ok(())
    }
}

impl Validate for InvitationConfig {
    fn validate(&self) -> Result<(), String> {
        if !(1..=30).contains(&self.validity_days) {
            return Err("Invitation validity must be between 1 and 30 days".to_string());
        }
        if self.sweep_interval_secs == 0 {
            return Err("Sweep interval must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for PaymentConfig {
    fn validate(&self) -> Result<(), String> {
        for gateway in &self.gateways {
            if !KNOWN_GATEWAYS.contains(&gateway.to_ascii_lowercase().as_str()) {
                return Err(format!("Unknown payment gateway: {}", gateway));
            }
        }
        if self.simulated_latency_ms > 30_000 {
            return Err("Simulated latency should not exceed 30 seconds".to_string());
        }
        Ok(())
    }
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(account) = &self.super_admin {
            if account.name.trim().is_empty() {
                return Err("Bootstrap super-admin name cannot be empty".to_string());
            }
            if !account.email.contains('@') {
                return Err(format!("Invalid bootstrap email: {}", account.email));
            }
            crate::auth::password::validate_password(&account.password)
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("User name cannot be empty".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("Invalid email: {}", self.email));
        }
        Ok(())
    }
}
