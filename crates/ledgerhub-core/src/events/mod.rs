//! Automation events emitted by the maintenance workers.
//!
//! Events are dispatched through the automation sink and consumed by the
//! notification pipeline; the sink persists them, downstream channels
//! (mail, webhooks) are wired by the surrounding system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TenantId;

/// An event produced by the periodic sweep over tenant subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AutomationEvent {
    /// A trial subscription is about to end.
    TrialEnding {
        /// The tenant whose trial is ending.
        tenant_id: TenantId,
        /// When the trial ends.
        trial_ends_at: DateTime<Utc>,
    },
    /// A tenant has invoices past their due date.
    PaymentOverdue {
        /// The tenant with overdue invoices.
        tenant_id: TenantId,
        /// How many invoices are overdue.
        overdue_count: u64,
    },
}

impl AutomationEvent {
    /// Stable event type name used for persistence and routing.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TrialEnding { .. } => "TrialEnding",
            Self::PaymentOverdue { .. } => "PaymentOverdue",
        }
    }

    /// The tenant this event concerns, if any.
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            Self::TrialEnding { tenant_id, .. } => Some(*tenant_id),
            Self::PaymentOverdue { tenant_id, .. } => Some(*tenant_id),
        }
    }

    /// Structured payload for the persisted notification row.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::TrialEnding {
                tenant_id,
                trial_ends_at,
            } => serde_json::json!({
                "tenant_id": tenant_id,
                "trial_ends_at": trial_ends_at,
            }),
            Self::PaymentOverdue {
                tenant_id,
                overdue_count,
            } => serde_json::json!({
                "tenant_id": tenant_id,
                "overdue_count": overdue_count,
            }),
        }
    }
}
