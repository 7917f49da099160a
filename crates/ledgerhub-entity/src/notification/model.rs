//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use ledgerhub_core::events::AutomationEvent;
use ledgerhub_core::types::TenantId;

/// A persisted automation event, awaiting delivery by downstream channels.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The tenant this notification concerns (if any).
    pub tenant_id: Option<TenantId>,
    /// Event type that produced this notification.
    pub event_type: String,
    /// Structured event data.
    pub payload: serde_json::Value,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build the persisted form of an automation event.
    pub fn from_event(event: &AutomationEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: event.tenant_id(),
            event_type: event.event_type().to_string(),
            payload: event.payload(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_event() {
        let event = AutomationEvent::PaymentOverdue {
            tenant_id: TenantId::new(5),
            overdue_count: 2,
        };
        let notification = Notification::from_event(&event);
        assert_eq!(notification.event_type, "PaymentOverdue");
        assert_eq!(notification.tenant_id, Some(TenantId::new(5)));
        assert_eq!(notification.payload["overdue_count"], 2);
    }
}
