//! Session cookie encoding
//!
//! The cookie carries the persisted session envelope with only the current
//! user's identity and role; orders, sales and permissions are looked up in
//! the directory by id. Signed cookies look like `<base64url(json)>.<hex hmac-sha256>`. The
//! legacy unsigned form, the bare JSON envelope, is accepted only when the
//! codec is built with `accept_unsigned`.

use crate::core::models::User;
use crate::core::session::{PersistedSession, PersistedState};
use crate::utils::crypto;
use crate::utils::error::{Result, StorefrontError};
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Why a cookie value could not be turned into a user
#[derive(Debug, Error)]
pub enum SessionCookieError {
    #[error("session cookie is empty")]
    Empty,
    #[error("session cookie is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("session cookie signature does not match")]
    BadSignature,
    #[error("unsigned session cookies are not accepted")]
    Unsigned,
    #[error("session cookie payload is invalid: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("session cookie expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Signs and verifies session cookie values
#[derive(Clone)]
pub struct SessionCookieCodec {
    secret: String,
    max_age: Duration,
    accept_unsigned: bool,
}

impl std::fmt::Debug for SessionCookieCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookieCodec")
            .field("max_age", &self.max_age)
            .field("accept_unsigned", &self.accept_unsigned)
            .finish_non_exhaustive()
    }
}

impl SessionCookieCodec {
    pub fn new(secret: impl Into<String>, max_age: Duration) -> Self {
        Self {
            secret: secret.into(),
            max_age,
            accept_unsigned: false,
        }
    }

    pub fn accept_unsigned(mut self, accept: bool) -> Self {
        self.accept_unsigned = accept;
        self
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Cookie value for `user`, issued now
    pub fn encode(&self, user: &User) -> Result<String> {
        self.encode_at(user, Utc::now())
    }

    pub fn encode_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String> {
        let envelope = PersistedSession {
            state: PersistedState {
                current_user: Some(user.session_claim()),
                users: Vec::new(),
            },
            version: 0,
            expires_at: Some(issued_at + self.max_age),
        };

        let json = serde_json::to_vec(&envelope)?;
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(json);
        let signature = crypto::sign(&self.secret, &payload)
            .map_err(|e| StorefrontError::internal(format!("failed to sign session: {}", e)))?;
        Ok(format!("{}.{}", payload, signature))
    }

    /// The current user named by a cookie value, if any
    pub fn decode(&self, raw: &str) -> std::result::Result<Option<User>, SessionCookieError> {
        self.decode_at(raw, Utc::now())
    }

    pub fn decode_at(
        &self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Option<User>, SessionCookieError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SessionCookieError::Empty);
        }

        let envelope: PersistedSession = if raw.starts_with('{') {
            if !self.accept_unsigned {
                return Err(SessionCookieError::Unsigned);
            }
            serde_json::from_str(raw)?
        } else {
            let (payload, signature) = raw
                .rsplit_once('.')
                .ok_or(SessionCookieError::BadSignature)?;
            let valid = crypto::verify(&self.secret, payload, signature)
                .map_err(|_| SessionCookieError::BadSignature)?;
            if !valid {
                return Err(SessionCookieError::BadSignature);
            }
            let json = general_purpose::URL_SAFE_NO_PAD.decode(payload)?;
            serde_json::from_slice(&json)?
        };

        if let Some(expires_at) = envelope.expires_at {
            if now >= expires_at {
                return Err(SessionCookieError::Expired(expires_at));
            }
        }

        Ok(envelope.state.current_user)
    }
}
