//! Initial accounts

use serde::{Deserialize, Serialize};

/// Accounts created on first start, when the directory has no super-admin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub super_admin: Option<BootstrapAccount>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
