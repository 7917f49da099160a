//! Database-backed sweep store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ledgerhub_core::result::AppResult;
use ledgerhub_core::types::TenantId;
use ledgerhub_database::repositories::{SaleRepository, SubscriptionRepository};
use ledgerhub_entity::sale::OverdueSummary;
use ledgerhub_entity::subscription::ExpiringTrial;

use crate::sweep::SweepStore;

/// [`SweepStore`] implementation over the live repositories.
#[derive(Debug, Clone)]
pub struct DatabaseSweepStore {
    /// Subscription repository.
    subscriptions: Arc<SubscriptionRepository>,
    /// Sale repository.
    sales: Arc<SaleRepository>,
}

impl DatabaseSweepStore {
    /// Create a new database sweep store.
    pub fn new(subscriptions: Arc<SubscriptionRepository>, sales: Arc<SaleRepository>) -> Self {
        Self {
            subscriptions,
            sales,
        }
    }
}

#[async_trait]
impl SweepStore for DatabaseSweepStore {
    async fn schema_ready(&self) -> AppResult<bool> {
        self.subscriptions.table_exists().await
    }

    async fn trials_ending_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiringTrial>> {
        self.subscriptions.trials_ending_between(from, until).await
    }

    async fn tenants_with_subscriptions(&self) -> AppResult<Vec<TenantId>> {
        self.subscriptions.distinct_tenant_ids().await
    }

    async fn overdue_counts(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueSummary>> {
        self.sales.overdue_counts(now).await
    }
}
