//! File operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::errors::InventoryError;

/// Exclusive advisory lock held for the lifetime of this guard.
///
/// The lock lives on a stable sidecar path rather than the data file: the
/// atomic rename commit replaces the data file's inode, which would strand
/// any lock taken on it.
#[derive(Debug)]
pub struct FileLock {
    handle: std::fs::File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.handle.unlock();
    }
}

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Take an exclusive OS-level lock guarding this file, blocking until
    /// any other holder (including one in another process) releases it
    pub async fn lock_exclusive(&self) -> Result<FileLock, InventoryError> {
        let lock_path = self.path.with_extension("lock");
        let handle = tokio::task::spawn_blocking(move || -> std::io::Result<std::fs::File> {
            if let Some(parent) = lock_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let handle = std::fs::File::create(&lock_path)?;
            handle.lock()?;
            Ok(handle)
        })
        .await
        .map_err(|e| InventoryError::Internal(e.to_string()))??;

        Ok(FileLock { handle })
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, InventoryError> {
        let mut file = fs::File::open(&self.path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;
        Ok(contents)
    }

    /// Read file as JSON
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, InventoryError> {
        let contents = self.read_string().await?;
        let value = serde_json::from_str(&contents)?;
        Ok(value)
    }

    /// Write JSON to file via an atomic temp-file rename
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), InventoryError> {
        let contents = serde_json::to_string_pretty(value)?;
        self.write_atomic(contents.as_bytes()).await
    }

    /// Atomic write using a temporary file
    pub async fn write_atomic(&self, contents: &[u8]) -> Result<(), InventoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Per-process temp name so overlapping writers never clobber each
        // other's staging file
        let temp_path = self
            .path
            .with_extension(format!("tmp.{}", std::process::id()));

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    /// Set file permissions to owner-read/write only (0o600) on Unix.
    ///
    /// A no-op on non-Unix platforms.
    pub async fn set_permissions_600(&self) -> Result<(), InventoryError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let meta = fs::metadata(&self.path).await?;
            let mut perms = meta.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).await?;
        }
        Ok(())
    }
}
