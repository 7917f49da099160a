//! Sale entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use ledgerhub_core::types::TenantId;

use super::status::PaymentStatus;

/// A sale invoice issued by a tenant.
///
/// Monetary amounts are stored in integer cents.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    /// Unique sale identifier.
    pub id: Uuid,
    /// The tenant that issued the invoice.
    pub tenant_id: TenantId,
    /// Human-facing invoice number.
    pub invoice_no: String,
    /// Invoice total in cents.
    pub total_cents: i64,
    /// Amount already paid in cents.
    pub amount_paid_cents: i64,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Payment due date.
    pub due_date: Option<DateTime<Utc>>,
    /// When the sale was recorded.
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Outstanding balance in cents.
    pub fn outstanding_cents(&self) -> i64 {
        self.total_cents - self.amount_paid_cents
    }

    /// Check if the invoice is unpaid or partially paid and past due.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.payment_status.is_outstanding()
            && self.due_date.map(|due| due < now).unwrap_or(false)
    }
}

/// Per-tenant overdue invoice count, as produced by the sweep query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OverdueSummary {
    /// The tenant with overdue invoices.
    pub tenant_id: TenantId,
    /// Number of overdue invoices.
    pub overdue_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4(),
            tenant_id: TenantId::new(1),
            invoice_no: "INV-0001".to_string(),
            total_cents: 10_000,
            amount_paid_cents: 2_500,
            payment_status: PaymentStatus::Partial,
            due_date: Some(now - Duration::days(3)),
            created_at: now - Duration::days(10),
        };
        assert!(sale.is_overdue(now));
        assert_eq!(sale.outstanding_cents(), 7_500);

        let paid = Sale {
            payment_status: PaymentStatus::Paid,
            ..sale.clone()
        };
        assert!(!paid.is_overdue(now));

        let no_due_date = Sale {
            due_date: None,
            ..sale
        };
        assert!(!no_due_date.is_overdue(now));
    }
}
