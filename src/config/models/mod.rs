//! Configuration data models

#![allow(missing_docs)]

pub mod bootstrap;
pub mod invitation;
pub mod payment;
pub mod server;
pub mod session;
pub mod storage;

pub use bootstrap::*;
pub use invitation::*;
pub use payment::*;
pub use server::*;
pub use session::*;
pub use storage::*;

use serde::{Deserialize, Serialize};

/// All storefront configuration sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub invitations: InvitationConfig,
    #[serde(default)]
    pub payments: PaymentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_cookie_name() -> String {
    "storefront-session".to_string()
}

pub fn default_notice_cookie_name() -> String {
    "storefront-notice".to_string()
}

/// Seven days, in seconds
pub fn default_session_max_age() -> u64 {
    7 * 24 * 60 * 60
}

pub fn default_validity_days() -> u32 {
    7
}

pub fn default_sweep_interval() -> u64 {
    3600
}

pub fn default_gateways() -> Vec<String> {
    vec!["stripe".to_string(), "paypal".to_string()]
}

pub fn default_simulated_latency() -> u64 {
    1000
}
