//! # storefront-gate
//!
//! Role-based access control for a multi-role storefront.
//!
//! - **Route classification**: an ordered table of path patterns, each
//!   admitting a set of roles; first match wins.
//! - **Edge guard**: actix middleware that checks the signed session cookie
//!   before any handler runs and redirects to login or to the caller's
//!   landing page.
//! - **Client guard**: re-checks identity and role inside handlers against
//!   the live user directory, and renders nothing until it is loaded.
//! - **Session store**: the user directory and current session, with change
//!   notification and pluggable persistence.
//! - **Invitations**: single-use, expiring tokens that are the only way to
//!   obtain a staff or artist role.
//!
//! Both guards share one pure decision function, [`auth::decide`].
//!
//! ```rust,no_run
//! use storefront_gate::server::builder::run_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     run_server("config/storefront.yaml").await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod utils;

pub use auth::{AccessDecision, ClientGuard, EdgeGuard, RouteTable, decide};
pub use config::Config;
pub use core::models::{User, UserRole, UserStatus};
pub use core::session::{SessionContext, SessionStore};
pub use utils::error::{Result, StorefrontError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
