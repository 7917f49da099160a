//! Scheduled backup orchestrator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::{Semaphore, watch};
use tracing::{debug, error, info, warn};

use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::backup::{BackupOptions, BackupProvider};
use ledgerhub_core::traits::settings::SettingsStore;
use ledgerhub_core::traits::tenant::TenantRegistry;
use ledgerhub_core::types::TenantStatus;

use crate::retention::prune_expired;
use crate::schedule::{self, BackupSchedule};
use crate::wait::sleep_or_shutdown;

/// Pause after a completed cycle before the schedule is recomputed, so a
/// schedule resolving to "now" cannot re-trigger in a tight loop.
const CYCLE_COOLDOWN: Duration = Duration::from_secs(60);

/// Backoff after an iteration fails.
const ERROR_BACKOFF: Duration = Duration::from_secs(60 * 60);

/// Outcome of one scheduled cycle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The lock was free and every eligible tenant was attempted.
    Completed {
        /// Tenants backed up successfully.
        succeeded: usize,
        /// Tenants whose backup failed.
        failed: usize,
    },
    /// A previous cycle still holds the run lock; nothing was done.
    SkippedLockHeld,
}

/// Orchestrates the recurring full-backup cycle across all tenants.
///
/// A single process-wide run lock guarantees at most one cycle in
/// flight; acquisition is zero-wait, so a cycle that finds the lock held
/// is dropped entirely rather than queued behind a slow predecessor.
#[derive(Debug)]
pub struct BackupWorker {
    /// Settings store the schedule is re-read from each iteration.
    settings: Arc<dyn SettingsStore>,
    /// Registry of backup-eligible tenants.
    tenants: Arc<dyn TenantRegistry>,
    /// Backup producer and artifact store.
    backups: Arc<dyn BackupProvider>,
    /// Global run lock (single permit, try-acquire only).
    run_lock: Arc<Semaphore>,
}

impl BackupWorker {
    /// Create a new backup worker.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        tenants: Arc<dyn TenantRegistry>,
        backups: Arc<dyn BackupProvider>,
    ) -> Self {
        Self {
            settings,
            tenants,
            backups,
            run_lock: Arc::new(Semaphore::new(1)),
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!("Backup worker started");

        loop {
            if *cancel.borrow() {
                break;
            }
            if self.run_iteration(&mut cancel).await {
                break;
            }
        }

        info!("Backup worker stopped");
    }

    /// One full iteration: resolve the schedule, wait for the run time,
    /// execute the cycle, cool down.
    ///
    /// Returns `true` when shutdown was requested.
    async fn run_iteration(&self, cancel: &mut watch::Receiver<bool>) -> bool {
        let schedule = schedule::load_schedule(self.settings.as_ref()).await;

        if !schedule.enabled {
            debug!("Scheduled backups disabled; idling");
            return sleep_or_shutdown(cancel, schedule::IDLE_INTERVAL).await;
        }

        let now = Local::now().naive_local();
        let next_run = schedule::next_run_after(now, &schedule);
        let delay = (next_run - now)
            .to_std()
            .unwrap_or(schedule::MIN_WAIT)
            .max(schedule::MIN_WAIT);

        info!(%next_run, "Next backup cycle scheduled");
        if sleep_or_shutdown(cancel, delay).await {
            return true;
        }

        match self.execute_cycle(&schedule).await {
            Ok(CycleOutcome::SkippedLockHeld) => {
                warn!("Previous backup cycle still running; dropping this cycle");
                sleep_or_shutdown(cancel, schedule::IDLE_INTERVAL).await
            }
            Ok(CycleOutcome::Completed { succeeded, failed }) => {
                info!(succeeded, failed, "Backup cycle finished");
                sleep_or_shutdown(cancel, CYCLE_COOLDOWN).await
            }
            Err(e) => {
                error!(error = %e, "Backup cycle failed; backing off");
                sleep_or_shutdown(cancel, ERROR_BACKOFF).await
            }
        }
    }

    /// Try to take the run lock and execute one cycle.
    ///
    /// The lock is held for the whole cycle, pruning included, and is
    /// released on every path out of this function.
    pub async fn execute_cycle(&self, schedule: &BackupSchedule) -> AppResult<CycleOutcome> {
        let _permit = match self.run_lock.try_acquire() {
            Ok(permit) => permit,
            Err(_) => return Ok(CycleOutcome::SkippedLockHeld),
        };

        let tenant_ids = self
            .tenants
            .list_tenant_ids(&TenantStatus::BACKUP_ELIGIBLE)
            .await?;
        info!(tenants = tenant_ids.len(), "Starting backup cycle");

        let options = BackupOptions::default();
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for tenant_id in tenant_ids {
            match self.backups.create_full_backup(tenant_id, &options).await {
                Ok(file_name) => {
                    info!(%tenant_id, file_name, "Tenant backup complete");
                    succeeded += 1;
                }
                Err(e) => {
                    error!(%tenant_id, error = %e, "Tenant backup failed");
                    failed += 1;
                }
            }
        }

        match prune_expired(self.backups.as_ref(), schedule.retention_days).await {
            Ok(deleted) => info!(deleted, "Retention pruning complete"),
            Err(e) => error!(error = %e, "Retention pruning failed"),
        }

        Ok(CycleOutcome::Completed { succeeded, failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use ledgerhub_core::error::AppError;
    use ledgerhub_core::traits::backup::BackupArtifact;
    use ledgerhub_core::types::TenantId;

    #[derive(Debug)]
    struct EmptySettings;

    #[async_trait]
    impl SettingsStore for EmptySettings {
        async fn get(&self, _owner_id: i64, _key: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct StaticTenants(Vec<TenantId>);

    #[async_trait]
    impl TenantRegistry for StaticTenants {
        async fn list_tenant_ids(&self, statuses: &[TenantStatus]) -> AppResult<Vec<TenantId>> {
            assert_eq!(statuses, &TenantStatus::BACKUP_ELIGIBLE[..]);
            Ok(self.0.clone())
        }
    }

    /// Backup provider recording attempts; one tenant can be made to fail.
    #[derive(Debug, Default)]
    struct RecordingBackups {
        attempted: Mutex<Vec<TenantId>>,
        fail_for: Option<TenantId>,
        list_calls: AtomicUsize,
    }

    #[async_trait]
    impl BackupProvider for RecordingBackups {
        async fn create_full_backup(
            &self,
            tenant_id: TenantId,
            options: &BackupOptions,
        ) -> AppResult<String> {
            assert!(!options.export_to_desktop);
            assert!(!options.upload_to_google_drive);
            assert!(!options.send_email);

            self.attempted.lock().unwrap().push(tenant_id);
            if self.fail_for == Some(tenant_id) {
                return Err(AppError::backup("dump failed"));
            }
            Ok(format!("tenant-{tenant_id}-{}.json", Utc::now().timestamp()))
        }

        async fn list_backups(&self) -> AppResult<Vec<BackupArtifact>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn delete_backup(&self, _file_name: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn worker(
        tenants: Vec<TenantId>,
        backups: Arc<RecordingBackups>,
    ) -> BackupWorker {
        BackupWorker::new(
            Arc::new(EmptySettings),
            Arc::new(StaticTenants(tenants)),
            backups,
        )
    }

    fn tenant_ids(ids: &[i64]) -> Vec<TenantId> {
        ids.iter().copied().map(TenantId::new).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_schedule_idles_without_backup() {
        let backups = Arc::new(RecordingBackups::default());
        let worker = worker(tenant_ids(&[1]), Arc::clone(&backups));
        let (_tx, mut rx) = watch::channel(false);

        let start = tokio::time::Instant::now();
        let shutdown = worker.run_iteration(&mut rx).await;

        assert!(!shutdown);
        assert_eq!(start.elapsed(), schedule::IDLE_INTERVAL);
        assert!(backups.attempted.lock().unwrap().is_empty());
        assert_eq!(backups.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_one_failing_tenant_does_not_abort_the_rest() {
        let backups = Arc::new(RecordingBackups {
            fail_for: Some(TenantId::new(2)),
            ..Default::default()
        });
        let worker = worker(tenant_ids(&[1, 2, 3]), Arc::clone(&backups));

        let outcome = worker
            .execute_cycle(&BackupSchedule::disabled())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CycleOutcome::Completed {
                succeeded: 2,
                failed: 1
            }
        );
        assert_eq!(*backups.attempted.lock().unwrap(), tenant_ids(&[1, 2, 3]));
        // Pruning ran even though one tenant failed.
        assert_eq!(backups.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_held_lock_skips_cycle_entirely() {
        let backups = Arc::new(RecordingBackups::default());
        let worker = worker(tenant_ids(&[1, 2]), Arc::clone(&backups));

        let _held = worker.run_lock.try_acquire().unwrap();
        let outcome = worker
            .execute_cycle(&BackupSchedule::disabled())
            .await
            .unwrap();

        assert_eq!(outcome, CycleOutcome::SkippedLockHeld);
        assert!(backups.attempted.lock().unwrap().is_empty());
        assert_eq!(backups.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lock_released_after_cycle() {
        let backups = Arc::new(RecordingBackups::default());
        let worker = worker(tenant_ids(&[1]), Arc::clone(&backups));

        worker
            .execute_cycle(&BackupSchedule::disabled())
            .await
            .unwrap();
        // A second cycle acquires the lock again.
        let outcome = worker
            .execute_cycle(&BackupSchedule::disabled())
            .await
            .unwrap();
        assert!(matches!(outcome, CycleOutcome::Completed { .. }));
    }

    #[derive(Debug)]
    struct BrokenTenants;

    #[async_trait]
    impl TenantRegistry for BrokenTenants {
        async fn list_tenant_ids(&self, _statuses: &[TenantStatus]) -> AppResult<Vec<TenantId>> {
            Err(AppError::database("tenants table unreachable"))
        }
    }

    #[tokio::test]
    async fn test_lock_released_when_tenant_listing_fails() {
        let backups = Arc::new(RecordingBackups::default());
        let worker = BackupWorker::new(
            Arc::new(EmptySettings),
            Arc::new(BrokenTenants),
            Arc::clone(&backups) as Arc<dyn BackupProvider>,
        );

        assert!(worker.execute_cycle(&BackupSchedule::disabled()).await.is_err());
        // The lock must not leak on the error path.
        assert!(worker.run_lock.try_acquire().is_ok());
    }
}
