//! Subscription reconciliation contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::TenantId;

/// Trait for the per-tenant subscription status reconciliation pass.
///
/// Side-effecting and fire-and-forget from the caller's perspective: the
/// implementation may transition subscription state (expire lapsed trials,
/// suspend unpaid accounts), and the caller only logs failures.
#[async_trait]
pub trait SubscriptionReconciler: Send + Sync + std::fmt::Debug {
    /// Reconcile the subscription state of one tenant.
    async fn check_status(&self, tenant_id: TenantId) -> AppResult<()>;
}
