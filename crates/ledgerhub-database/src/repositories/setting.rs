//! Settings repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use ledgerhub_core::error::{AppError, ErrorKind};
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::settings::SettingsStore;

/// Repository for owner-scoped key-value settings.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a setting value, if present.
    pub async fn get_value(&self, owner_id: i64, key: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM settings WHERE owner_id = $1 AND key = $2",
        )
        .bind(owner_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read setting", e))
    }

    /// Insert or overwrite a setting value.
    pub async fn set_value(&self, owner_id: i64, key: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO settings (owner_id, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (owner_id, key) DO UPDATE SET value = $3, updated_at = NOW()",
        )
        .bind(owner_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write setting", e))?;
        Ok(())
    }

    /// Insert a setting value only if the key is not present yet.
    ///
    /// Returns `true` if a row was inserted.
    pub async fn set_if_absent(&self, owner_id: i64, key: &str, value: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO settings (owner_id, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (owner_id, key) DO NOTHING",
        )
        .bind(owner_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to seed setting", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SettingsStore for SettingRepository {
    async fn get(&self, owner_id: i64, key: &str) -> AppResult<Option<String>> {
        self.get_value(owner_id, key).await
    }
}
