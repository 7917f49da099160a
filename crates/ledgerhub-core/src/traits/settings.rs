//! Key-value settings store contract.

use async_trait::async_trait;

use crate::result::AppResult;

/// Owner id of the system-wide settings scope.
///
/// Rows owned by this sentinel apply to the whole installation rather
/// than a single tenant.
pub const SYSTEM_OWNER_ID: i64 = 0;

/// Trait for the mutable key-value settings store.
///
/// Workers read their schedule from here on every iteration, never
/// caching values, so operators can reconfigure without a restart.
#[async_trait]
pub trait SettingsStore: Send + Sync + std::fmt::Debug {
    /// Fetch a setting value scoped to the given owner, if present.
    async fn get(&self, owner_id: i64, key: &str) -> AppResult<Option<String>>;

    /// Fetch a system-scoped setting value, if present.
    async fn get_system(&self, key: &str) -> AppResult<Option<String>> {
        self.get(SYSTEM_OWNER_ID, key).await
    }
}
