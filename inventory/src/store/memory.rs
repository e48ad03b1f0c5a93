//! In-memory inventory store

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::InventoryError;
use crate::models::device::{Device, StatusAttributes};
use crate::models::group::DeviceGroup;
use crate::store::{InventorySnapshot, InventoryStore};

/// Non-durable store backed by an in-process snapshot.
///
/// Used by tests and embedders; all mutations run under the write lock so
/// the snapshot's conditional checks stay atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<InventorySnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InventorySnapshot> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InventorySnapshot> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn get_group(&self, id: &str) -> Result<Option<DeviceGroup>, InventoryError> {
        Ok(self.read().group(id).cloned())
    }

    async fn get_device(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<Option<Device>, InventoryError> {
        Ok(self.read().device(group_id, hostname).cloned())
    }

    async fn onboard_device(
        &self,
        device: Device,
        new_group: Option<DeviceGroup>,
    ) -> Result<Device, InventoryError> {
        self.write().onboard_device(device, new_group)
    }

    async fn remove_device(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<usize, InventoryError> {
        self.write().remove_device(group_id, hostname)
    }

    async fn delete_group(&self, id: &str) -> Result<Vec<Device>, InventoryError> {
        self.write().delete_group(id)
    }

    async fn set_group_zone(&self, id: &str, zone: String) -> Result<DeviceGroup, InventoryError> {
        self.write().set_group_zone(id, zone)
    }

    async fn set_admin_state(&self, group_id: &str, up: bool) -> Result<usize, InventoryError> {
        self.write().set_admin_state(group_id, up)
    }

    async fn record_refresh(
        &self,
        group_id: &str,
        hostname: &str,
        attributes: StatusAttributes,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Device, InventoryError> {
        self.write().record_refresh(group_id, hostname, attributes, refreshed_at)
    }

    async fn list(&self) -> Result<Vec<(DeviceGroup, Vec<Device>)>, InventoryError> {
        Ok(self.read().list())
    }
}
