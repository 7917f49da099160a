//! Backup schedule resolution.
//!
//! The schedule lives in the system settings scope and is re-read on
//! every orchestrator iteration so operators can change it without a
//! restart. Reads fail soft: a broken settings store disables backups
//! for the cycle instead of killing the worker.

use std::str::FromStr;
use std::time::Duration;

use chrono::{Datelike, Duration as TimeDelta, NaiveDateTime, NaiveTime};
use tracing::warn;

use ledgerhub_core::error::AppError;
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::settings::SettingsStore;
use ledgerhub_entity::setting::keys;

/// How long the orchestrator idles when the schedule is disabled or a
/// cycle was skipped.
pub const IDLE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Floor on the pre-run wait; a missed window runs after this delay
/// instead of a full day later.
pub const MIN_WAIT: Duration = Duration::from_secs(10);

/// Retention window applied when the stored value is absent or invalid.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Run time applied when the stored value is absent or invalid.
pub fn default_run_time() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).expect("literal time is valid")
}

/// How often the recurring backup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupFrequency {
    /// Every day at the configured time.
    Daily,
    /// Every Sunday at the configured time.
    Weekly,
}

impl FromStr for BackupFrequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(AppError::validation(format!(
                "Invalid backup frequency: '{s}'. Expected 'daily' or 'weekly'"
            ))),
        }
    }
}

/// The operator-configured backup schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupSchedule {
    /// Whether scheduled backups run at all.
    pub enabled: bool,
    /// Wall-clock time of day the cycle starts.
    pub time_of_day: NaiveTime,
    /// Daily or weekly cadence.
    pub frequency: BackupFrequency,
    /// Days an artifact is kept before it is prunable.
    pub retention_days: u32,
}

impl BackupSchedule {
    /// Safe fallback used when the settings store cannot be read.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            time_of_day: default_run_time(),
            frequency: BackupFrequency::Daily,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// Read the schedule from the system settings scope.
///
/// A store error yields the disabled fallback; individually unparsable
/// values fall back field by field.
pub async fn load_schedule(settings: &dyn SettingsStore) -> BackupSchedule {
    match try_load_schedule(settings).await {
        Ok(schedule) => schedule,
        Err(e) => {
            warn!(
                error = %e,
                "Failed to read backup schedule settings; treating backups as disabled"
            );
            BackupSchedule::disabled()
        }
    }
}

async fn try_load_schedule(settings: &dyn SettingsStore) -> AppResult<BackupSchedule> {
    let enabled = settings
        .get_system(keys::BACKUP_SCHEDULE_ENABLED)
        .await?
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let time_of_day = settings
        .get_system(keys::BACKUP_SCHEDULE_TIME)
        .await?
        .and_then(|v| NaiveTime::parse_from_str(v.trim(), "%H:%M").ok())
        .unwrap_or_else(default_run_time);

    let frequency = settings
        .get_system(keys::BACKUP_SCHEDULE_FREQUENCY)
        .await?
        .and_then(|v| v.parse::<BackupFrequency>().ok())
        .unwrap_or(BackupFrequency::Daily);

    let retention_days = settings
        .get_system(keys::BACKUP_RETENTION_DAYS)
        .await?
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_RETENTION_DAYS);

    Ok(BackupSchedule {
        enabled,
        time_of_day,
        frequency,
        retention_days,
    })
}

/// Compute the next run instant strictly after `now`.
///
/// Daily: today at the configured time, or tomorrow if that has passed.
/// Weekly: layered on the daily rule — the coming Sunday at the
/// configured time, plus a week when it is already Sunday and the time
/// has passed.
pub fn next_run_after(now: NaiveDateTime, schedule: &BackupSchedule) -> NaiveDateTime {
    let mut next = now.date().and_time(schedule.time_of_day);
    if next <= now {
        next += TimeDelta::days(1);
    }

    if schedule.frequency == BackupFrequency::Weekly {
        let days_until_sunday = (7 - i64::from(now.weekday().num_days_from_sunday())) % 7;
        let mut sunday = (now.date() + TimeDelta::days(days_until_sunday)).and_time(schedule.time_of_day);
        if sunday <= now {
            sunday += TimeDelta::days(7);
        }
        next = sunday;
    }

    next
}
