//! Authorization for the storefront
//!
//! Both guards answer the same question through [`decision::decide`]: the edge
//! guard from the session cookie alone, the client guard from a live session
//! context.

pub mod client;
pub mod cookie;
pub mod decision;
pub mod edge;
pub mod invitation;
pub mod password;
pub mod routes;

pub use client::{ClientGuard, GuardOutcome, GuardView, NoticeKind, RejectionNotice, RoleRequirement};
pub use cookie::{SessionCookieCodec, SessionCookieError};
pub use decision::{AccessDecision, Redirect, RedirectReason, decide, login_redirect};
pub use edge::EdgeGuard;
pub use invitation::{InvitationError, InvitationService, NewInvitation, Registration};
pub use routes::{PatternError, ProtectedRoute, RouteAccess, RoutePattern, RouteTable};
