//! Tenant registry contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{TenantId, TenantStatus};

/// Trait for enumerating tenants by account status.
#[async_trait]
pub trait TenantRegistry: Send + Sync + std::fmt::Debug {
    /// List the ids of all tenants whose status is in `statuses`.
    async fn list_tenant_ids(&self, statuses: &[TenantStatus]) -> AppResult<Vec<TenantId>>;
}
