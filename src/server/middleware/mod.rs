//! HTTP middleware

mod edge_guard;

pub use edge_guard::{EdgeGuardMiddleware, EdgeGuardMiddlewareService};
