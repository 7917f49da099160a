//! Subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use ledgerhub_core::types::TenantId;

use super::status::SubscriptionStatus;

/// A tenant's subscription to the platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: Uuid,
    /// The owning tenant.
    pub tenant_id: TenantId,
    /// Plan name.
    pub plan: String,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// When the trial ends (trial subscriptions only).
    pub trial_ends_at: Option<DateTime<Utc>>,
    /// End of the current paid billing period.
    pub current_period_end: Option<DateTime<Utc>>,
    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
    /// When the subscription was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Check if this subscription is a trial whose end date has passed.
    pub fn trial_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Trial
            && self.trial_ends_at.map(|end| end < now).unwrap_or(false)
    }
}

/// Projection row for the expiring-trial sweep query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpiringTrial {
    /// The tenant whose trial is ending.
    pub tenant_id: TenantId,
    /// When the trial ends.
    pub trial_ends_at: DateTime<Utc>,
}
