//! Well-known settings keys.
//!
//! All four backup keys live in the system scope (owner id 0).

/// "true"/"false" (case-insensitive): whether scheduled backups run at all.
pub const BACKUP_SCHEDULE_ENABLED: &str = "BACKUP_SCHEDULE_ENABLED";

/// Wall-clock run time in "HH:mm" format.
pub const BACKUP_SCHEDULE_TIME: &str = "BACKUP_SCHEDULE_TIME";

/// "daily" or "weekly".
pub const BACKUP_SCHEDULE_FREQUENCY: &str = "BACKUP_SCHEDULE_FREQUENCY";

/// Integer number of days a backup artifact is retained.
pub const BACKUP_RETENTION_DAYS: &str = "BACKUP_RETENTION_DAYS";
