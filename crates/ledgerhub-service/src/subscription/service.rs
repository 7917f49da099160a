//! Per-tenant subscription status reconciliation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::subscription::SubscriptionReconciler;
use ledgerhub_core::types::TenantId;
use ledgerhub_database::repositories::SubscriptionRepository;
use ledgerhub_entity::subscription::SubscriptionStatus;

/// Reconciles the stored subscription state of a tenant against the clock.
///
/// Currently a single rule: trial subscriptions whose end date has passed
/// transition to `expired`. Billing-period enforcement happens in the
/// payment pipeline, not here.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    /// Subscription repository.
    subscription_repo: Arc<SubscriptionRepository>,
}

impl SubscriptionService {
    /// Create a new subscription service.
    pub fn new(subscription_repo: Arc<SubscriptionRepository>) -> Self {
        Self { subscription_repo }
    }
}

#[async_trait]
impl SubscriptionReconciler for SubscriptionService {
    async fn check_status(&self, tenant_id: TenantId) -> AppResult<()> {
        let now = Utc::now();
        let subscriptions = self.subscription_repo.find_by_tenant(tenant_id).await?;

        for subscription in subscriptions {
            if subscription.trial_lapsed(now) {
                self.subscription_repo
                    .set_status(subscription.id, SubscriptionStatus::Expired)
                    .await?;
                info!(
                    %tenant_id,
                    subscription_id = %subscription.id,
                    "Expired lapsed trial subscription"
                );
            }
        }

        Ok(())
    }
}
