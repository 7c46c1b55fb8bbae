//! Mock payment processing
//!
//! Two built-in gateways fabricate a successful charge after a simulated
//! delay. Nothing is ever sent to a real processor.

use crate::config::PaymentConfig;
use crate::utils::error::{Result, StorefrontError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Gateways this processor knows how to simulate
pub const KNOWN_GATEWAYS: [&str; 2] = ["stripe", "paypal"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub gateway: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub order_id: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub success: bool,
    pub transaction_id: String,
    pub gateway: String,
    pub amount: f64,
    pub currency: String,
    pub order_id: String,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MockPaymentProcessor {
    enabled: Vec<String>,
    latency: Duration,
}

impl MockPaymentProcessor {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            enabled: config
                .gateways
                .iter()
                .map(|g| g.to_ascii_lowercase())
                .collect(),
            latency: Duration::from_millis(config.simulated_latency_ms),
        }
    }

    pub fn enabled_gateways(&self) -> &[String] {
        &self.enabled
    }

    pub async fn process(&self, request: PaymentRequest) -> Result<PaymentReceipt> {
        let gateway = request.gateway.trim().to_ascii_lowercase();

        if !KNOWN_GATEWAYS.contains(&gateway.as_str()) {
            return Err(StorefrontError::payment(format!(
                "Unsupported payment gateway: {}",
                request.gateway
            )));
        }
        if !self.enabled.contains(&gateway) {
            return Err(StorefrontError::GatewayNotConfigured(gateway));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(StorefrontError::validation("amount must be a positive number"));
        }
        let currency = request.currency.trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(StorefrontError::validation(format!(
                "invalid currency code: {}",
                request.currency
            )));
        }
        if request.order_id.trim().is_empty() {
            return Err(StorefrontError::validation("order id is required"));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let receipt = PaymentReceipt {
            success: true,
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
            gateway,
            amount: request.amount,
            currency,
            order_id: request.order_id,
            processed_at: Utc::now(),
        };
        info!(
            "Simulated {} payment of {} {} for order {}",
            receipt.gateway, receipt.amount, receipt.currency, receipt.order_id
        );
        Ok(receipt)
    }
}
