//! In-memory session store with optional persistence

use super::context::{SessionContext, SessionPhase};
use super::persistence::{PERSISTED_VERSION, PersistedSession, PersistedState, SessionPersistence};
use crate::core::models::{User, UserRole, UserStatus};
use crate::utils::error::{Result, StorefrontError};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug)]
struct StoreState {
    phase: SessionPhase,
    current_user: Option<User>,
    users: Vec<User>,
    revision: u64,
}

impl StoreState {
    fn context(&self) -> SessionContext {
        SessionContext {
            phase: self.phase,
            current_user: self.current_user.clone(),
            revision: self.revision,
        }
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }
}

/// Current user plus the user directory
///
/// Mutations are synchronous and published to subscribers before the call
/// returns. Every mutation is refused until [`SessionStore::hydrate`] has run.
pub struct SessionStore {
    state: RwLock<StoreState>,
    updates: watch::Sender<SessionContext>,
    persistence: Option<Arc<dyn SessionPersistence>>,
    /// Held from snapshot to completed save so saves land in mutation order
    persist_lock: Mutex<()>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.read())
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl SessionStore {
    /// A store with no backing storage
    pub fn new() -> Self {
        let (updates, _) = watch::channel(SessionContext::uninitialized());
        Self {
            state: RwLock::new(StoreState {
                phase: SessionPhase::Uninitialized,
                current_user: None,
                users: Vec::new(),
                revision: 0,
            }),
            updates,
            persistence: None,
            persist_lock: Mutex::new(()),
        }
    }

    pub fn with_persistence(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self {
            persistence: Some(persistence),
            ..Self::new()
        }
    }

    /// Load persisted state and mark the store initialized
    pub async fn hydrate(&self) -> Result<()> {
        let persisted = match &self.persistence {
            Some(persistence) => persistence.load().await?,
            None => None,
        };

        let mut state = self.state.write();
        if state.phase == SessionPhase::Initialized {
            return Err(StorefrontError::session("session store already initialized"));
        }

        if let Some(persisted) = persisted {
            let mut users: Vec<User> = Vec::with_capacity(persisted.state.users.len());
            for user in persisted.state.users {
                if users.iter().any(|u| u.id == user.id || u.has_email(&user.email)) {
                    warn!("Skipping duplicate persisted user {}", user.id);
                    continue;
                }
                users.push(user);
            }

            // The directory is authoritative for the current user
            state.current_user = persisted
                .state
                .current_user
                .and_then(|current| users.iter().find(|u| u.id == current.id).cloned());
            state.users = users;
        }

        state.phase = SessionPhase::Initialized;
        state.revision += 1;
        info!("Session store initialized with {} users", state.users.len());
        self.updates.send_replace(state.context());
        Ok(())
    }

    /// Write the current state to the backing storage, if any
    pub async fn persist(&self) -> Result<()> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };

        let _saving = self.persist_lock.lock().await;
        let snapshot = {
            let state = self.state.read();
            if state.phase != SessionPhase::Initialized {
                return Err(StorefrontError::session("cannot persist before initialization"));
            }
            PersistedSession {
                state: PersistedState {
                    current_user: state.current_user.clone(),
                    users: state.users.clone(),
                },
                version: PERSISTED_VERSION,
                expires_at: None,
            }
        };

        persistence.save(&snapshot).await
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase() == SessionPhase::Initialized
    }

    pub fn context(&self) -> SessionContext {
        self.state.read().context()
    }

    /// Receive a fresh context after every mutation
    pub fn subscribe(&self) -> watch::Receiver<SessionContext> {
        self.updates.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().current_user.clone()
    }

    /// Replace the current user; a present user must exist in the directory
    pub fn set_current_user(&self, user: Option<User>) -> Result<()> {
        self.mutate(|state| {
            if let Some(user) = &user {
                let existing = state
                    .users
                    .iter()
                    .find(|u| u.id == user.id)
                    .ok_or_else(|| StorefrontError::not_found(format!("user {}", user.id)))?;
                if existing.role != user.role {
                    return Err(StorefrontError::validation("role does not match directory"));
                }
            }
            state.current_user = user;
            Ok(())
        })
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }

    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.state.read().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.state
            .read()
            .users
            .iter()
            .find(|u| u.has_email(email))
            .cloned()
    }

    pub fn users_by_role(&self, role: UserRole) -> Vec<User> {
        self.filter(|u| u.role == role)
    }

    pub fn users_by_status(&self, status: UserStatus) -> Vec<User> {
        self.filter(|u| u.status == status)
    }

    /// Add a user; ids and emails are unique
    pub fn add_user(&self, user: User) -> Result<User> {
        self.mutate(|state| {
            if state.position(user.id).is_some() {
                return Err(StorefrontError::conflict(format!("user {} already exists", user.id)));
            }
            if state.users.iter().any(|u| u.has_email(&user.email)) {
                return Err(StorefrontError::conflict(format!(
                    "email {} is already registered",
                    user.email
                )));
            }
            debug!("Adding user {} ({})", user.id, user.role);
            state.users.push(user.clone());
            Ok(user)
        })
    }

    /// Replace exactly one record by id; the role cannot change here
    pub fn update_user(&self, user: User) -> Result<User> {
        self.mutate(|state| {
            let index = state
                .position(user.id)
                .ok_or_else(|| StorefrontError::not_found(format!("user {}", user.id)))?;

            if state.users[index].role != user.role {
                return Err(StorefrontError::validation("user role cannot be changed"));
            }
            if state
                .users
                .iter()
                .any(|u| u.id != user.id && u.has_email(&user.email))
            {
                return Err(StorefrontError::conflict(format!(
                    "email {} is already registered",
                    user.email
                )));
            }

            state.users[index] = user.clone();
            if state.current_user.as_ref().is_some_and(|c| c.id == user.id) {
                state.current_user = Some(user.clone());
            }
            Ok(user)
        })
    }

    /// Remove exactly one record by id
    pub fn delete_user(&self, id: Uuid) -> Result<User> {
        self.mutate(|state| {
            let index = state
                .position(id)
                .ok_or_else(|| StorefrontError::not_found(format!("user {}", id)))?;

            let removed = state.users.remove(index);
            if state.current_user.as_ref().is_some_and(|c| c.id == id) {
                state.current_user = None;
            }
            debug!("Deleted user {}", id);
            Ok(removed)
        })
    }

    /// Role change granted by an accepted invitation
    pub(crate) fn assign_invited_role(&self, id: Uuid, role: UserRole) -> Result<User> {
        self.mutate(|state| {
            let index = state
                .position(id)
                .ok_or_else(|| StorefrontError::not_found(format!("user {}", id)))?;

            let mut user = state.users[index].clone();
            user.role = role;
            user.reset_role_fields();
            state.users[index] = user.clone();
            if state.current_user.as_ref().is_some_and(|c| c.id == id) {
                state.current_user = Some(user.clone());
            }
            info!("User {} granted role {} by invitation", id, role);
            Ok(user)
        })
    }

    fn filter(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        self.state
            .read()
            .users
            .iter()
            .filter(|u| predicate(u))
            .cloned()
            .collect()
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write();
        if state.phase != SessionPhase::Initialized {
            return Err(StorefrontError::session("session store is not initialized"));
        }

        let output = f(&mut state)?;
        state.revision += 1;
        self.updates.send_replace(state.context());
        Ok(output)
    }
}
