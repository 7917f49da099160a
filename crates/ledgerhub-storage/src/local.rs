//! Local filesystem backup store.

use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use ledgerhub_core::error::{AppError, ErrorKind};
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::backup::BackupArtifact;

/// Flat-directory store for backup artifacts.
///
/// Artifacts are addressed by bare file name; names containing path
/// separators are rejected so callers cannot escape the root.
#[derive(Debug, Clone)]
pub struct LocalBackupStore {
    /// Directory holding all artifacts.
    root: PathBuf,
}

impl LocalBackupStore {
    /// Create a new store rooted at the given directory, creating it if
    /// missing.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create backup root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve an artifact file name to its path within the root.
    fn resolve(&self, file_name: &str) -> AppResult<PathBuf> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(AppError::validation(format!(
                "Invalid artifact file name: '{file_name}'"
            )));
        }
        Ok(self.root.join(file_name))
    }

    /// Write artifact bytes, returning the number of bytes written.
    pub async fn write(&self, file_name: &str, data: Bytes) -> AppResult<u64> {
        let path = self.resolve(file_name)?;
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write artifact: {file_name}"),
                e,
            )
        })?;
        debug!(file_name, bytes = data.len(), "Wrote backup artifact");
        Ok(data.len() as u64)
    }

    /// Enumerate all artifacts with their creation timestamps.
    pub async fn list(&self) -> AppResult<Vec<BackupArtifact>> {
        let mut entries = fs::read_dir(&self.root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read backup root: {}", self.root.display()),
                e,
            )
        })?;

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read backup entry", e)
        })? {
            let metadata = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to stat backup entry", e)
            })?;
            if !metadata.is_file() {
                continue;
            }

            // Some filesystems do not report a birth time; fall back to mtime.
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        "Failed to read artifact timestamp",
                        e,
                    )
                })?;
            let created_at: DateTime<Utc> = created.into();

            artifacts.push(BackupArtifact {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                created_at,
                size_bytes: metadata.len(),
            });
        }

        artifacts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(artifacts)
    }

    /// Delete an artifact by file name.
    pub async fn delete(&self, file_name: &str) -> AppResult<()> {
        let path = self.resolve(file_name)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Artifact not found: {file_name}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete artifact: {file_name}"),
                    e,
                )
            }
        })?;
        debug!(file_name, "Deleted backup artifact");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBackupStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store
            .write("tenant-1-20250101000000.json", Bytes::from("{}"))
            .await
            .unwrap();
        store
            .write("tenant-2-20250101000000.json", Bytes::from("{}"))
            .await
            .unwrap();

        let artifacts = store.list().await.unwrap();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts
            .iter()
            .any(|a| a.file_name == "tenant-1-20250101000000.json"));

        store.delete("tenant-1-20250101000000.json").await.unwrap();
        let artifacts = store.list().await.unwrap();
        assert_eq!(artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBackupStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let err = store.delete("absent.json").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rejects_path_separators() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBackupStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert!(store.delete("../escape.json").await.is_err());
        assert!(store.write("a/b.json", Bytes::from("x")).await.is_err());
    }
}
