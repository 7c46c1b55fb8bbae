//! Invitation configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    /// How often lapsed invitations are swept, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl InvitationConfig {
    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.validity_days))
    }
}
