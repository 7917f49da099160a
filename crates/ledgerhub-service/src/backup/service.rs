//! Full-backup producer backed by the local artifact store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use ledgerhub_core::error::AppError;
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::backup::{BackupArtifact, BackupOptions, BackupProvider};
use ledgerhub_core::types::TenantId;
use ledgerhub_database::repositories::{SaleRepository, SubscriptionRepository, TenantRepository};
use ledgerhub_storage::LocalBackupStore;

/// Produces full per-tenant snapshot artifacts.
///
/// A snapshot is a self-contained JSON document holding the tenant row
/// and every subscription and sale belonging to it.
#[derive(Debug, Clone)]
pub struct BackupService {
    /// Tenant repository.
    tenant_repo: Arc<TenantRepository>,
    /// Subscription repository.
    subscription_repo: Arc<SubscriptionRepository>,
    /// Sale repository.
    sale_repo: Arc<SaleRepository>,
    /// Artifact store.
    store: Arc<LocalBackupStore>,
}

impl BackupService {
    /// Create a new backup service.
    pub fn new(
        tenant_repo: Arc<TenantRepository>,
        subscription_repo: Arc<SubscriptionRepository>,
        sale_repo: Arc<SaleRepository>,
        store: Arc<LocalBackupStore>,
    ) -> Self {
        Self {
            tenant_repo,
            subscription_repo,
            sale_repo,
            store,
        }
    }
}

/// Build the artifact file name for a tenant snapshot taken at `at`.
pub(crate) fn snapshot_file_name(tenant_id: TenantId, at: DateTime<Utc>) -> String {
    format!("tenant-{}-{}.json", tenant_id, at.format("%Y%m%d%H%M%S"))
}

#[async_trait]
impl BackupProvider for BackupService {
    async fn create_full_backup(
        &self,
        tenant_id: TenantId,
        options: &BackupOptions,
    ) -> AppResult<String> {
        let tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tenant not found: {tenant_id}")))?;

        let subscriptions = self.subscription_repo.find_by_tenant(tenant_id).await?;
        let sales = self.sale_repo.find_by_tenant(tenant_id).await?;

        let now = Utc::now();
        let snapshot = serde_json::json!({
            "format_version": 1,
            "generated_at": now,
            "tenant": tenant,
            "subscriptions": subscriptions,
            "sales": sales,
        });
        let data = serde_json::to_vec_pretty(&snapshot)?;

        let file_name = snapshot_file_name(tenant_id, now);
        let size = self.store.write(&file_name, Bytes::from(data)).await?;

        if options.export_to_desktop || options.upload_to_google_drive || options.send_email {
            warn!(
                %tenant_id,
                "Extra delivery channels requested but not configured; artifact stored locally only"
            );
        }

        info!(%tenant_id, file_name, size_bytes = size, "Created full tenant backup");
        Ok(file_name)
    }

    async fn list_backups(&self) -> AppResult<Vec<BackupArtifact>> {
        self.store.list().await
    }

    async fn delete_backup(&self, file_name: &str) -> AppResult<()> {
        self.store.delete(file_name).await
    }
}
