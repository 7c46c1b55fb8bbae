//! Invitation flow for elevated roles
//!
//! Customers register themselves. Artists, admins and super-admins only come
//! into being by redeeming an invitation token, which converts into a user
//! with the invited role exactly once.

use super::password::{hash_password, validate_password, verify_password};
use crate::core::models::{Invitation, InvitationStatus, Inviter, User, UserRole};
use crate::core::session::SessionStore;
use crate::utils::crypto::generate_token;
use crate::utils::error::{Result, StorefrontError};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Length of generated invitation tokens
pub const TOKEN_LENGTH: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvitationError {
    #[error("invitation not found")]
    NotFound,
    #[error("invitation has expired")]
    Expired,
    #[error("invitation has already been used")]
    AlreadyUsed,
    #[error("invitation has been revoked")]
    Revoked,
    #[error("the {0} role is not granted by invitation")]
    RoleNotInvitable(UserRole),
    #[error("a {inviter} may not invite a {role}")]
    InviterNotPermitted { inviter: UserRole, role: UserRole },
}

impl InvitationError {
    pub fn code(&self) -> &'static str {
        match self {
            InvitationError::NotFound => "INVITATION_NOT_FOUND",
            InvitationError::Expired => "INVITATION_EXPIRED",
            InvitationError::AlreadyUsed => "INVITATION_ALREADY_USED",
            InvitationError::Revoked => "INVITATION_REVOKED",
            InvitationError::RoleNotInvitable(_) => "ROLE_NOT_INVITABLE",
            InvitationError::InviterNotPermitted { .. } => "INVITER_NOT_PERMITTED",
        }
    }

    fn from_status(status: InvitationStatus) -> Option<Self> {
        match status {
            InvitationStatus::Pending => None,
            InvitationStatus::Accepted => Some(InvitationError::AlreadyUsed),
            InvitationStatus::Revoked => Some(InvitationError::Revoked),
            InvitationStatus::Expired => Some(InvitationError::Expired),
        }
    }
}

/// Request to invite someone
#[derive(Debug, Clone, Deserialize)]
pub struct NewInvitation {
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub message: Option<String>,
}

/// Details supplied by the invitee on acceptance
///
/// For an email that already has an account, `password` must be that
/// account's current password and `name` is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub password: String,
}

/// Issues, tracks and redeems invitations
pub struct InvitationService {
    invitations: DashMap<String, Invitation>,
    sessions: Arc<SessionStore>,
    validity: Duration,
}

impl InvitationService {
    pub fn new(sessions: Arc<SessionStore>, validity: Duration) -> Self {
        Self {
            invitations: DashMap::new(),
            sessions,
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    pub fn create(&self, inviter: &User, request: NewInvitation) -> Result<Invitation> {
        self.create_at(inviter, request, Utc::now())
    }

    pub fn create_at(
        &self,
        inviter: &User,
        request: NewInvitation,
        now: DateTime<Utc>,
    ) -> Result<Invitation> {
        if !request.role.is_invitable() {
            return Err(InvitationError::RoleNotInvitable(request.role).into());
        }
        if !inviter.role.can_invite(request.role) {
            return Err(InvitationError::InviterNotPermitted {
                inviter: inviter.role,
                role: request.role,
            }
            .into());
        }

        let email = normalize_email(&request.email)?;
        if let Some(existing) = self.sessions.find_by_email(&email) {
            if existing.role == request.role {
                return Err(StorefrontError::conflict(format!(
                    "{} already has the {} role",
                    email, request.role
                )));
            }
        }

        let duplicate = self.invitations.iter().any(|entry| {
            let invitation = entry.value();
            invitation.is_pending()
                && !invitation.is_expired_at(now)
                && invitation.role == request.role
                && invitation.email.eq_ignore_ascii_case(&email)
        });
        if duplicate {
            return Err(StorefrontError::conflict(format!(
                "{} already has a pending {} invitation",
                email, request.role
            )));
        }

        loop {
            let token = generate_token(TOKEN_LENGTH);
            if let Entry::Vacant(slot) = self.invitations.entry(token.clone()) {
                let invitation = Invitation::new(
                    token,
                    email,
                    request.role,
                    Inviter::from(inviter),
                    self.validity,
                    now,
                )
                .with_message(request.message);

                info!(
                    "Invitation for {} as {} issued by {}",
                    invitation.email, invitation.role, inviter.id
                );
                slot.insert(invitation.clone());
                return Ok(invitation);
            }
        }
    }

    /// Look up an invitation, marking it expired if its time has passed
    pub fn get(&self, token: &str) -> Result<Invitation> {
        self.get_at(token, Utc::now())
    }

    pub fn get_at(&self, token: &str, now: DateTime<Utc>) -> Result<Invitation> {
        let mut entry = self
            .invitations
            .get_mut(token)
            .ok_or(InvitationError::NotFound)?;
        entry.refresh_status(now);
        Ok(entry.clone())
    }

    /// Invitation that can still be redeemed
    pub fn pending(&self, token: &str) -> Result<Invitation> {
        let invitation = self.get(token)?;
        match InvitationError::from_status(invitation.status) {
            Some(error) => Err(error.into()),
            None => Ok(invitation),
        }
    }

    /// All invitations, newest first
    pub fn list(&self, status: Option<InvitationStatus>) -> Vec<Invitation> {
        let now = Utc::now();
        let mut invitations: Vec<Invitation> = self
            .invitations
            .iter_mut()
            .map(|mut entry| {
                entry.refresh_status(now);
                entry.clone()
            })
            .filter(|invitation| status.is_none_or(|s| invitation.status == s))
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        invitations
    }

    /// Withdraw a pending invitation; only its inviter or a super-admin may
    pub fn revoke(&self, token: &str, by: &User) -> Result<Invitation> {
        let now = Utc::now();
        let mut entry = self
            .invitations
            .get_mut(token)
            .ok_or(InvitationError::NotFound)?;

        if entry.invited_by.id != by.id && by.role != UserRole::SuperAdmin {
            return Err(StorefrontError::authorization(
                "only the inviter or a super-admin may revoke an invitation",
            ));
        }

        entry.refresh_status(now);
        if let Some(error) = InvitationError::from_status(entry.status) {
            return Err(error.into());
        }

        entry.status = InvitationStatus::Revoked;
        entry.revoked_at = Some(now);
        info!("Invitation for {} revoked by {}", entry.email, by.id);
        Ok(entry.clone())
    }

    pub fn accept(&self, token: &str, registration: Registration) -> Result<User> {
        self.accept_at(token, registration, Utc::now())
    }

    /// Redeem a token: at most one caller ever succeeds
    ///
    /// The invitation entry stays locked from the status check until it is
    /// marked accepted, and it is left pending if the user cannot be created.
    pub fn accept_at(
        &self,
        token: &str,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let email = self
            .invitations
            .get(token)
            .map(|invitation| invitation.email.clone())
            .ok_or(InvitationError::NotFound)?;

        // Hashing is slow, so do it before taking the entry lock
        let existing = self.sessions.find_by_email(&email);
        let new_password_hash = match &existing {
            Some(_) => None,
            None => {
                validate_password(&registration.password)?;
                Some(hash_password(&registration.password)?)
            }
        };
        if let Some(existing) = &existing {
            let verified = match &existing.password_hash {
                Some(hash) => verify_password(&registration.password, hash)?,
                None => false,
            };
            if !verified {
                return Err(StorefrontError::auth(
                    "password does not match the existing account",
                ));
            }
        }

        let mut entry = self
            .invitations
            .get_mut(token)
            .ok_or(InvitationError::NotFound)?;
        if entry.refresh_status(now) {
            debug!("Invitation for {} expired before acceptance", entry.email);
        }
        if let Some(error) = InvitationError::from_status(entry.status) {
            warn!("Rejected invitation acceptance for {}: {}", entry.email, error);
            return Err(error.into());
        }

        let user = match (existing, new_password_hash) {
            (Some(existing), _) => self.sessions.assign_invited_role(existing.id, entry.role)?,
            (None, Some(password_hash)) => {
                let name = registration.name.trim();
                if name.is_empty() {
                    return Err(StorefrontError::validation("name is required"));
                }
                let mut user =
                    User::new(name, entry.email.clone(), entry.role).with_password_hash(password_hash);
                user.email_verified = true;
                self.sessions.add_user(user)?
            }
            (None, None) => return Err(StorefrontError::internal("missing password hash")),
        };

        entry.status = InvitationStatus::Accepted;
        entry.accepted_at = Some(now);
        entry.accepted_by = Some(user.id);
        info!("Invitation accepted: {} is now {}", user.id, user.role);
        Ok(user)
    }

    /// Mark every lapsed pending invitation expired; returns how many changed
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let expired = self
            .invitations
            .iter_mut()
            .filter_map(|mut entry| entry.refresh_status(now).then_some(()))
            .count();
        if expired > 0 {
            debug!("Expired {} invitations", expired);
        }
        expired
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(StorefrontError::validation(format!("invalid email address: {}", email)));
    }
    Ok(email.to_string())
}
