//! Backup producer and artifact store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::TenantId;

/// Delivery options for a full tenant backup.
///
/// The scheduled pipeline always runs with every option disabled;
/// interactive callers (admin console) may opt in to extra delivery
/// channels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BackupOptions {
    /// Also copy the artifact to the operator's export directory.
    pub export_to_desktop: bool,
    /// Also upload the artifact to the configured Google Drive folder.
    pub upload_to_google_drive: bool,
    /// Also e-mail the artifact to the tenant's billing contact.
    pub send_email: bool,
}

/// Metadata about a stored backup artifact.
///
/// Artifacts are owned by the backup provider; callers reference them by
/// file name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupArtifact {
    /// Opaque artifact file name.
    pub file_name: String,
    /// When the artifact was created.
    pub created_at: DateTime<Utc>,
    /// Artifact size in bytes.
    pub size_bytes: u64,
}

/// Trait for producing, enumerating, and deleting tenant backups.
#[async_trait]
pub trait BackupProvider: Send + Sync + std::fmt::Debug {
    /// Produce a full backup of one tenant's data and return the artifact
    /// file name.
    async fn create_full_backup(
        &self,
        tenant_id: TenantId,
        options: &BackupOptions,
    ) -> AppResult<String>;

    /// Enumerate all stored backup artifacts.
    async fn list_backups(&self) -> AppResult<Vec<BackupArtifact>>;

    /// Delete a backup artifact by file name.
    async fn delete_backup(&self, file_name: &str) -> AppResult<()>;
}
