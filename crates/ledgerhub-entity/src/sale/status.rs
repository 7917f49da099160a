//! Payment status enumeration for sales.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment state of a sale invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Unpaid,
    /// Partially paid.
    Partial,
    /// Fully settled.
    Paid,
}

impl PaymentStatus {
    /// Check if the invoice still has an outstanding balance.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Unpaid | Self::Partial)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
