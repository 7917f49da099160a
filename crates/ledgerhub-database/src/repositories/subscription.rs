//! Subscription repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ledgerhub_core::error::{AppError, ErrorKind};
use ledgerhub_core::result::AppResult;
use ledgerhub_core::types::TenantId;
use ledgerhub_entity::subscription::{ExpiringTrial, Subscription, SubscriptionStatus};

/// Repository for subscription records.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check that the subscriptions table exists.
    ///
    /// The sweep worker probes this before each cycle so a deployment whose
    /// migrations have not run yet degrades to a skipped cycle instead of a
    /// query error.
    pub async fn table_exists(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT to_regclass('public.subscriptions') IS NOT NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to probe schema", e)
            })
    }

    /// List subscriptions belonging to a tenant.
    pub async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE tenant_id = $1 ORDER BY created_at",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subscriptions", e)
        })
    }

    /// List trial subscriptions whose end date falls within the window.
    pub async fn trials_ending_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiringTrial>> {
        sqlx::query_as::<_, ExpiringTrial>(
            "SELECT tenant_id, trial_ends_at FROM subscriptions \
             WHERE status = 'trial' AND trial_ends_at IS NOT NULL \
               AND trial_ends_at >= $1 AND trial_ends_at <= $2 \
             ORDER BY trial_ends_at",
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to query expiring trials", e)
        })
    }

    /// List every distinct tenant holding at least one subscription row.
    pub async fn distinct_tenant_ids(&self) -> AppResult<Vec<TenantId>> {
        sqlx::query_scalar::<_, TenantId>(
            "SELECT DISTINCT tenant_id FROM subscriptions ORDER BY tenant_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subscribed tenants", e)
        })
    }

    /// Transition a subscription to a new status.
    pub async fn set_status(&self, id: Uuid, status: SubscriptionStatus) -> AppResult<()> {
        sqlx::query("UPDATE subscriptions SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update subscription", e)
            })?;
        Ok(())
    }
}
