//! Setting entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single key-value setting row.
///
/// `owner_id` 0 is the system scope; any other value scopes the row to
/// one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    /// Scope owner (0 = system).
    pub owner_id: i64,
    /// Setting key.
    pub key: String,
    /// Setting value, stored as text.
    pub value: String,
    /// When the value was last changed.
    pub updated_at: DateTime<Utc>,
}
