//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Enable/disable flags for the long-running background workers.
///
/// Cadences and backoffs are fixed by the workers themselves; only whether
/// each worker runs at all is configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduled backup worker runs.
    #[serde(default = "default_true")]
    pub backup_enabled: bool,
    /// Whether the subscription sweep worker runs.
    #[serde(default = "default_true")]
    pub sweep_enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            backup_enabled: true,
            sweep_enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}
