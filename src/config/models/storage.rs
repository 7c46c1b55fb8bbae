//! Storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the user directory; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}
