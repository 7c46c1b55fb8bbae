//! Storefront services outside the authorization core

pub mod payments;

pub use payments::{MockPaymentProcessor, PaymentReceipt, PaymentRequest};
