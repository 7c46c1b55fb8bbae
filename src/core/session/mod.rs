//! Session state
//!
//! The session store owns the current user and the user directory. It starts
//! uninitialized and becomes initialized once persisted state has been loaded;
//! guards must not make a decision before that.

mod context;
mod persistence;
mod store;

pub use context::{SessionContext, SessionPhase};
pub use persistence::{
    JsonFilePersistence, MemoryPersistence, PersistedSession, PersistedState, SessionPersistence,
};
pub use store::SessionStore;
