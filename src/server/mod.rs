//! HTTP server
//!
//! The edge guard runs as middleware in front of every route; page and API
//! handlers run the client guard against the live user directory.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use state::AppState;
