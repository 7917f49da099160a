//! Age-based pruning of backup artifacts.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use tracing::{info, warn};

use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::backup::{BackupArtifact, BackupProvider};

/// Delete artifacts older than the retention window.
///
/// An artifact aged exactly `retention_days` is kept; deletion requires
/// strictly older. Individual delete failures are logged and skipped.
/// Returns the number of artifacts deleted.
pub async fn prune_expired(backups: &dyn BackupProvider, retention_days: u32) -> AppResult<usize> {
    let artifacts = backups.list_backups().await?;
    let cutoff = Utc::now() - TimeDelta::days(i64::from(retention_days));

    let mut deleted = 0usize;
    for artifact in expired_artifacts(&artifacts, cutoff) {
        match backups.delete_backup(&artifact.file_name).await {
            Ok(()) => {
                info!(
                    file_name = %artifact.file_name,
                    created_at = %artifact.created_at,
                    "Deleted expired backup artifact"
                );
                deleted += 1;
            }
            Err(e) => {
                warn!(
                    file_name = %artifact.file_name,
                    error = %e,
                    "Failed to delete expired backup artifact"
                );
            }
        }
    }

    Ok(deleted)
}

/// Artifacts created strictly before the cutoff.
fn expired_artifacts(
    artifacts: &[BackupArtifact],
    cutoff: DateTime<Utc>,
) -> Vec<&BackupArtifact> {
    artifacts.iter().filter(|a| a.created_at < cutoff).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use ledgerhub_core::error::AppError;
    use ledgerhub_core::traits::backup::BackupOptions;
    use ledgerhub_core::types::TenantId;

    fn artifact(age_days: i64, now: DateTime<Utc>) -> BackupArtifact {
        BackupArtifact {
            file_name: format!("tenant-1-age{age_days}.json"),
            created_at: now - TimeDelta::days(age_days),
            size_bytes: 128,
        }
    }

    #[test]
    fn test_cutoff_boundary_keeps_exact_age() {
        let now = Utc::now();
        let artifacts: Vec<BackupArtifact> =
            [10, 29, 30, 31, 90].map(|age| artifact(age, now)).to_vec();
        let cutoff = now - TimeDelta::days(30);

        let expired = expired_artifacts(&artifacts, cutoff);
        let names: Vec<&str> = expired.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["tenant-1-age31.json", "tenant-1-age90.json"]);
    }

    /// Backup provider serving a fixed artifact list and recording deletes.
    #[derive(Debug)]
    struct StaticBackups {
        artifacts: Vec<BackupArtifact>,
        deleted: Mutex<Vec<String>>,
        fail_delete_of: Option<String>,
        fail_list: bool,
    }

    impl StaticBackups {
        fn new(artifacts: Vec<BackupArtifact>) -> Self {
            Self {
                artifacts,
                deleted: Mutex::new(Vec::new()),
                fail_delete_of: None,
                fail_list: false,
            }
        }
    }

    #[async_trait]
    impl BackupProvider for StaticBackups {
        async fn create_full_backup(
            &self,
            _tenant_id: TenantId,
            _options: &BackupOptions,
        ) -> AppResult<String> {
            unreachable!("not exercised by pruning tests")
        }

        async fn list_backups(&self) -> AppResult<Vec<BackupArtifact>> {
            if self.fail_list {
                return Err(AppError::storage("backup root unreadable"));
            }
            Ok(self.artifacts.clone())
        }

        async fn delete_backup(&self, file_name: &str) -> AppResult<()> {
            if self.fail_delete_of.as_deref() == Some(file_name) {
                return Err(AppError::storage("file locked"));
            }
            self.deleted.lock().unwrap().push(file_name.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_prune_deletes_only_expired() {
        let now = Utc::now();
        let backups =
            StaticBackups::new([10, 29, 30, 31, 90].map(|age| artifact(age, now)).to_vec());

        let deleted = prune_expired(&backups, 30).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(
            *backups.deleted.lock().unwrap(),
            vec!["tenant-1-age31.json", "tenant-1-age90.json"]
        );
    }

    #[tokio::test]
    async fn test_prune_continues_past_delete_failure() {
        let now = Utc::now();
        let mut backups =
            StaticBackups::new([31, 40].map(|age| artifact(age, now)).to_vec());
        backups.fail_delete_of = Some("tenant-1-age31.json".to_string());

        let deleted = prune_expired(&backups, 30).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(*backups.deleted.lock().unwrap(), vec!["tenant-1-age40.json"]);
    }

    #[tokio::test]
    async fn test_prune_propagates_list_failure() {
        let mut backups = StaticBackups::new(Vec::new());
        backups.fail_list = true;

        assert!(prune_expired(&backups, 30).await.is_err());
    }
}
