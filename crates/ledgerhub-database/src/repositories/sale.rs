//! Sale repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ledgerhub_core::error::{AppError, ErrorKind};
use ledgerhub_core::result::AppResult;
use ledgerhub_core::types::TenantId;
use ledgerhub_entity::sale::{OverdueSummary, Sale};

/// Repository for sale invoices.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    /// Create a new sale repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all sales belonging to a tenant.
    pub async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Sale>> {
        sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE tenant_id = $1 ORDER BY created_at")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sales", e))
    }

    /// Count unpaid or partially-paid sales past their due date, per tenant.
    pub async fn overdue_counts(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueSummary>> {
        sqlx::query_as::<_, OverdueSummary>(
            "SELECT tenant_id, COUNT(*) AS overdue_count FROM sales \
             WHERE payment_status IN ('unpaid', 'partial') \
               AND due_date IS NOT NULL AND due_date < $1 \
             GROUP BY tenant_id ORDER BY tenant_id",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count overdue sales", e)
        })
    }
}
