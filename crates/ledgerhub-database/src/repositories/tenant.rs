//! Tenant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use ledgerhub_core::error::{AppError, ErrorKind};
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::tenant::TenantRegistry;
use ledgerhub_core::types::{TenantId, TenantStatus};
use ledgerhub_entity::tenant::Tenant;

/// Repository for tenant records.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new tenant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tenant by id.
    pub async fn find_by_id(&self, id: TenantId) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tenant", e))
    }

    /// List tenant ids whose status is one of `statuses`.
    pub async fn list_ids_by_status(
        &self,
        statuses: &[TenantStatus],
    ) -> AppResult<Vec<TenantId>> {
        let names: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        sqlx::query_scalar::<_, TenantId>(
            "SELECT id FROM tenants WHERE status::text = ANY($1) ORDER BY id",
        )
        .bind(&names)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tenants", e))
    }
}

#[async_trait]
impl TenantRegistry for TenantRepository {
    async fn list_tenant_ids(&self, statuses: &[TenantStatus]) -> AppResult<Vec<TenantId>> {
        self.list_ids_by_status(statuses).await
    }
}
