//! Mock payment configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Gateways enabled for checkout
    #[serde(default = "default_gateways")]
    pub gateways: Vec<String>,
    /// Simulated processing latency in milliseconds
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            gateways: default_gateways(),
            simulated_latency_ms: default_simulated_latency(),
        }
    }
}
