//! Session cookie configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// HMAC key for signing session cookies; generated at startup when empty
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_session_max_age")]
    pub max_age_secs: u64,
    /// Mark cookies `Secure`
    #[serde(default)]
    pub secure: bool,
    /// Accept the legacy unsigned JSON cookie
    #[serde(default)]
    pub accept_unsigned: bool,
    /// Cookie carrying the rejection notice after a guard redirect
    #[serde(default = "default_notice_cookie_name")]
    pub notice_cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secret: String::new(),
            max_age_secs: default_session_max_age(),
            secure: false,
            accept_unsigned: false,
            notice_cookie_name: default_notice_cookie_name(),
        }
    }
}

impl SessionConfig {
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_age_secs as i64)
    }
}
