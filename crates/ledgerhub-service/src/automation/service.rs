//! Automation sink backed by the notifications table.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use ledgerhub_core::events::AutomationEvent;
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::automation::AutomationSink;
use ledgerhub_database::repositories::NotificationRepository;
use ledgerhub_entity::notification::Notification;

/// Persists automation events as notification rows.
///
/// Downstream delivery channels (mail, webhooks) consume the table; this
/// sink only records the event durably.
#[derive(Debug, Clone)]
pub struct AutomationService {
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
}

impl AutomationService {
    /// Create a new automation service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }
}

#[async_trait]
impl AutomationSink for AutomationService {
    async fn notify(&self, event: &AutomationEvent) -> AppResult<()> {
        let notification = Notification::from_event(event);
        self.notification_repo.create(&notification).await?;
        info!(
            event_type = event.event_type(),
            tenant_id = ?event.tenant_id(),
            "Dispatched automation event"
        );
        Ok(())
    }
}
