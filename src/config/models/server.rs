//! Server configuration

use super::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker threads; defaults to available parallelism
    pub workers: Option<usize>,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// CORS configuration for the storefront front end
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials; empty disables CORS
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub max_age: Option<usize>,
}

impl CorsConfig {
    pub fn enabled(&self) -> bool {
        !self.allowed_origins.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.allowed_origins.iter().any(|o| o == "*") {
            return Err("CORS cannot allow all origins (*) because session cookies are sent with credentials".to_string());
        }
        for origin in &self.allowed_origins {
            if url::Url::parse(origin).is_err() {
                return Err(format!("Invalid CORS origin: {}", origin));
            }
            if origin.starts_with("http://") && !origin.contains("localhost") {
                warn!("CORS origin {} is not HTTPS", origin);
            }
        }
        Ok(())
    }
}
