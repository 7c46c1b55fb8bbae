//! Storefront data models

pub mod invitation;
pub mod user;

pub use invitation::{Invitation, InvitationStatus, Inviter};
pub use user::{OrderSummary, SalesStats, User, UserRole, UserStatus};
