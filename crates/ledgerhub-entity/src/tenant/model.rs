//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use ledgerhub_core::types::{TenantId, TenantStatus};

/// An isolated customer account within the platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: TenantId,
    /// Display name of the business.
    pub name: String,
    /// Account status.
    pub status: TenantStatus,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last modified.
    pub updated_at: DateTime<Utc>,
}
