//! Application state shared across HTTP handlers

use crate::auth::password::hash_password;
use crate::auth::{EdgeGuard, InvitationService, RouteTable, SessionCookieCodec};
use crate::config::Config;
use crate::core::models::{User, UserRole};
use crate::core::session::{JsonFilePersistence, SessionStore};
use crate::services::MockPaymentProcessor;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc so cloning per worker is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Configuration (shared read-only)
    pub config: Arc<Config>,
    /// User directory
    pub sessions: Arc<SessionStore>,
    /// Protected-route table consulted by both guards
    pub routes: Arc<RouteTable>,
    pub cookies: Arc<SessionCookieCodec>,
    pub invitations: Arc<InvitationService>,
    pub payments: Arc<MockPaymentProcessor>,
}

impl AppState {
    /// Build state from configuration and hydrate the user directory
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let sessions = match &config.storage().path {
            Some(path) => {
                info!("User directory persisted at {:?}", path);
                SessionStore::with_persistence(Arc::new(JsonFilePersistence::new(path)))
            }
            None => {
                warn!("No storage path configured; the user directory lives in memory only");
                SessionStore::new()
            }
        };
        sessions.hydrate().await?;

        let state = Self::with_store(config, Arc::new(sessions));
        state.bootstrap().await?;
        Ok(state)
    }

    /// Assemble state around an already hydrated store
    pub fn with_store(config: Config, sessions: Arc<SessionStore>) -> Self {
        let routes = RouteTable::storefront();
        routes.warn_overlaps();

        let cookies = SessionCookieCodec::new(
            config.session().secret.clone(),
            config.session().max_age(),
        )
        .accept_unsigned(config.session().accept_unsigned);

        let invitations = InvitationService::new(sessions.clone(), config.invitations().validity());
        let payments = MockPaymentProcessor::new(config.payments());

        Self {
            config: Arc::new(config),
            sessions,
            routes: Arc::new(routes),
            cookies: Arc::new(cookies),
            invitations: Arc::new(invitations),
            payments: Arc::new(payments),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn edge_guard(&self) -> EdgeGuard {
        EdgeGuard::new(
            self.routes.clone(),
            self.cookies.clone(),
            self.config.session().cookie_name.clone(),
        )
    }

    /// Create the configured super-admin if the directory has none
    async fn bootstrap(&self) -> Result<()> {
        let Some(account) = &self.config.bootstrap().super_admin else {
            return Ok(());
        };
        if !self.sessions.users_by_role(UserRole::SuperAdmin).is_empty() {
            return Ok(());
        }
        if let Some(existing) = self.sessions.find_by_email(&account.email) {
            warn!(
                "Bootstrap email {} already belongs to a {}; not creating a super-admin",
                account.email, existing.role
            );
            return Ok(());
        }

        let mut user = User::new(account.name.clone(), account.email.clone(), UserRole::SuperAdmin)
            .with_password_hash(hash_password(&account.password)?);
        user.email_verified = true;
        let user = self.sessions.add_user(user)?;
        self.sessions.persist().await?;

        info!("Bootstrapped super-admin {} ({})", user.email, user.id);
        Ok(())
    }
}
