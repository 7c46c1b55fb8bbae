//! Configuration management
//!
//! Configuration comes from a YAML file, falls back to defaults, and can be
//! overridden from the environment.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::crypto::generate_secret;
use crate::utils::error::{Result, StorefrontError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding `server.host`
pub const ENV_HOST: &str = "STOREFRONT_HOST";
/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "STOREFRONT_PORT";
/// Environment variable overriding `session.secret`
pub const ENV_SESSION_SECRET: &str = "STOREFRONT_SESSION_SECRET";
/// Environment variable overriding `storage.path`
pub const ENV_DATA_PATH: &str = "STOREFRONT_DATA_PATH";

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub storefront: StorefrontConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StorefrontError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let storefront: StorefrontConfig = serde_yaml::from_str(content)
            .map_err(|e| StorefrontError::Config(format!("Failed to parse config: {}", e)))?;

        debug!("Configuration parsed");
        Ok(Self { storefront })
    }

    /// Defaults overridden from the process environment
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, a stand-in for the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.storefront.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.storefront.server.port = port
                .parse()
                .map_err(|_| StorefrontError::Config(format!("Invalid {}: {}", ENV_PORT, port)))?;
        }
        if let Some(secret) = lookup(ENV_SESSION_SECRET) {
            self.storefront.session.secret = secret;
        }
        if let Some(path) = lookup(ENV_DATA_PATH) {
            self.storefront.storage.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Fill in values that must exist at runtime but may be left unset
    pub fn prepare(mut self) -> Self {
        if self.storefront.session.secret.is_empty() {
            warn!(
                "No session secret configured; generated one for this process. Sessions will not survive a restart."
            );
            self.storefront.session.secret = generate_secret();
        }
        self
    }

    pub fn server(&self) -> &ServerConfig {
        &self.storefront.server
    }

    pub fn session(&self) -> &SessionConfig {
        &self.storefront.session
    }

    pub fn invitations(&self) -> &InvitationConfig {
        &self.storefront.invitations
    }

    pub fn payments(&self) -> &PaymentConfig {
        &self.storefront.payments
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storefront.storage
    }

    pub fn bootstrap(&self) -> &BootstrapConfig {
        &self.storefront.bootstrap
    }

    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.storefront.validate().map_err(StorefrontError::Config)?;

        if self.storefront.session.accept_unsigned {
            warn!("Unsigned session cookies are accepted; any client can claim any role");
        }
        if !self.storefront.session.secure {
            warn!("Session cookies are not marked Secure");
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.storefront).map_err(|e| {
            StorefrontError::Config(format!("Failed to serialize config to YAML: {}", e))
        })
    }
}
