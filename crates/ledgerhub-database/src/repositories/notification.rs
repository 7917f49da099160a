//! Notification repository implementation.

use sqlx::PgPool;

use ledgerhub_core::error::{AppError, ErrorKind};
use ledgerhub_core::result::AppResult;
use ledgerhub_entity::notification::Notification;

/// Repository for persisted automation notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a notification row.
    pub async fn create(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, tenant_id, event_type, payload, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(notification.id)
        .bind(notification.tenant_id)
        .bind(&notification.event_type)
        .bind(&notification.payload)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })?;
        Ok(())
    }
}
