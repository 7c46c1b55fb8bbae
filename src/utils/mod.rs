//! Shared utilities: error handling and cryptographic primitives

pub mod crypto;
pub mod error;
