//! Backup artifact storage configuration.

use serde::{Deserialize, Serialize};

/// Configuration for where tenant backup artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directory holding backup artifacts.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> String {
    "data/backups".to_string()
}
