//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{Result, StorefrontError};
use std::path::Path;
use tracing::{info, warn};

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| StorefrontError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration for the server
///
/// A missing file falls back to defaults; environment variables override
/// whatever the file says.
pub async fn load_config(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    info!("Loading configuration file: {}", config_path.display());

    let mut config = if config_path.exists() {
        Config::from_file(config_path).await?
    } else {
        warn!(
            "Configuration file {} not found, using defaults",
            config_path.display()
        );
        Config::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config.prepare())
}

/// Run the server with configuration loaded from `config_path`
pub async fn run_server(config_path: impl AsRef<Path>) -> Result<()> {
    info!("Starting storefront-gate {}", crate::VERSION);

    let config = load_config(config_path).await?;
    let server = ServerBuilder::new().with_config(config).build().await?;

    info!("Server starting at: http://{}", server.config().address());
    server.start().await
}
