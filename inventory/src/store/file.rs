//! JSON-file inventory store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::errors::InventoryError;
use crate::filesys::file::File;
use crate::models::device::{Device, StatusAttributes};
use crate::models::group::DeviceGroup;
use crate::store::{InventorySnapshot, InventoryStore};

/// Durable store persisting the inventory snapshot as a single JSON file.
///
/// Every operation reloads the snapshot and commits under an exclusive
/// OS-level lock held for the whole load-mutate-persist window, so
/// concurrent invocations from separate processes cannot lose each other's
/// committed writes. The in-process mutex keeps tasks within one instance
/// from contending for the OS lock on the blocking pool. Commits go
/// through an atomic temp-file rename, so a crashed write never leaves a
/// torn inventory. The file carries credentials and is kept at mode 0600.
pub struct FileStore {
    file: File,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(file: File) -> Self {
        Self {
            file,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<InventorySnapshot, InventoryError> {
        if !self.file.exists().await {
            return Ok(InventorySnapshot::default());
        }
        self.file.read_json().await
    }

    async fn persist(&self, snapshot: &InventorySnapshot) -> Result<(), InventoryError> {
        self.file.write_json(snapshot).await?;
        self.file.set_permissions_600().await
    }

    async fn with_snapshot<T, F>(&self, op: F) -> Result<T, InventoryError>
    where
        T: Send,
        F: FnOnce(&InventorySnapshot) -> T + Send,
    {
        let _guard = self.lock.lock().await;
        let _flock = self.file.lock_exclusive().await?;
        let snapshot = self.load().await?;
        Ok(op(&snapshot))
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T, InventoryError>
    where
        T: Send,
        F: FnOnce(&mut InventorySnapshot) -> Result<T, InventoryError> + Send,
    {
        let _guard = self.lock.lock().await;
        let _flock = self.file.lock_exclusive().await?;
        let mut snapshot = self.load().await?;
        let result = op(&mut snapshot)?;
        self.persist(&snapshot).await?;
        Ok(result)
    }
}

#[async_trait]
impl InventoryStore for FileStore {
    async fn get_group(&self, id: &str) -> Result<Option<DeviceGroup>, InventoryError> {
        self.with_snapshot(|s| s.group(id).cloned()).await
    }

    async fn get_device(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<Option<Device>, InventoryError> {
        self.with_snapshot(|s| s.device(group_id, hostname).cloned())
            .await
    }

    async fn onboard_device(
        &self,
        device: Device,
        new_group: Option<DeviceGroup>,
    ) -> Result<Device, InventoryError> {
        self.mutate(|s| s.onboard_device(device, new_group)).await
    }

    async fn remove_device(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<usize, InventoryError> {
        self.mutate(|s| s.remove_device(group_id, hostname)).await
    }

    async fn delete_group(&self, id: &str) -> Result<Vec<Device>, InventoryError> {
        self.mutate(|s| s.delete_group(id)).await
    }

    async fn set_group_zone(&self, id: &str, zone: String) -> Result<DeviceGroup, InventoryError> {
        self.mutate(|s| s.set_group_zone(id, zone)).await
    }

    async fn set_admin_state(&self, group_id: &str, up: bool) -> Result<usize, InventoryError> {
        self.mutate(|s| s.set_admin_state(group_id, up)).await
    }

    async fn record_refresh(
        &self,
        group_id: &str,
        hostname: &str,
        attributes: StatusAttributes,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Device, InventoryError> {
        self.mutate(|s| s.record_refresh(group_id, hostname, attributes, refreshed_at))
            .await
    }

    async fn list(&self) -> Result<Vec<(DeviceGroup, Vec<Device>)>, InventoryError> {
        self.with_snapshot(|s| s.list()).await
    }
}
