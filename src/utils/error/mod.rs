//! Error handling for the storefront gate
//!
//! One crate-wide error enum, helper constructors and the HTTP rendering used by
//! every handler.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{Result, StorefrontError};
