//! Inventory store contract and shared snapshot logic

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::InventoryError;
use crate::models::device::{Device, StatusAttributes};
use crate::models::group::DeviceGroup;

pub mod file;
pub mod memory;

/// Durable store contract consumed by the core.
///
/// Every mutation is a single atomic conditional operation: hostname
/// uniqueness and membership checks happen inside the store under its own
/// synchronization, never as read-then-write in the callers. Two concurrent
/// onboards of the same hostname cannot both succeed.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Point lookup by group id
    async fn get_group(&self, id: &str) -> Result<Option<DeviceGroup>, InventoryError>;

    /// Point lookup by group id and hostname; `None` unless the device
    /// exists and belongs to that group
    async fn get_device(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<Option<Device>, InventoryError>;

    /// Create a device, enforcing global hostname uniqueness and adding it
    /// to its group's membership in the same mutation. When `new_group` is
    /// given the group is created alongside the device, so a conflicting
    /// hostname never leaves an orphan group behind.
    async fn onboard_device(
        &self,
        device: Device,
        new_group: Option<DeviceGroup>,
    ) -> Result<Device, InventoryError>;

    /// Remove a device from a group, returning the post-mutation membership
    /// size for auto-delete decisions
    async fn remove_device(&self, group_id: &str, hostname: &str)
        -> Result<usize, InventoryError>;

    /// Delete a group and all member devices, returning the removed devices
    async fn delete_group(&self, id: &str) -> Result<Vec<Device>, InventoryError>;

    /// Set the group's default availability zone
    async fn set_group_zone(&self, id: &str, zone: String) -> Result<DeviceGroup, InventoryError>;

    /// Set the admin state of every member device of a group, returning the
    /// number of devices touched
    async fn set_admin_state(&self, group_id: &str, up: bool) -> Result<usize, InventoryError>;

    /// Record a successful reconciliation: replace `status_attributes`
    /// wholesale and stamp `last_refreshed_at`
    async fn record_refresh(
        &self,
        group_id: &str,
        hostname: &str,
        attributes: StatusAttributes,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Device, InventoryError>;

    /// Ordered full scan: groups in creation order, member devices in
    /// onboarding order within each group
    async fn list(&self) -> Result<Vec<(DeviceGroup, Vec<Device>)>, InventoryError>;
}

fn group_not_found(id: &str) -> InventoryError {
    InventoryError::NotFound(format!("device group {id}"))
}

fn device_not_found(group_id: &str, hostname: &str) -> InventoryError {
    InventoryError::NotFound(format!("device {hostname} in group {group_id}"))
}

/// The full inventory state, with every invariant-preserving mutation
/// implemented as a pure method.
///
/// Both store implementations funnel all writes through these methods under
/// their own lock, so they enforce identical semantics.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Groups in creation order
    #[serde(default)]
    groups: Vec<DeviceGroup>,

    /// Devices in onboarding order
    #[serde(default)]
    devices: Vec<Device>,
}

impl InventorySnapshot {
    pub fn group(&self, id: &str) -> Option<&DeviceGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn group_mut(&mut self, id: &str) -> Option<&mut DeviceGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// Look up a device, requiring it to belong to the given group
    pub fn device(&self, group_id: &str, hostname: &str) -> Option<&Device> {
        let group = self.group(group_id)?;
        if !group.contains(hostname) {
            return None;
        }
        self.devices
            .iter()
            .find(|d| d.icontrol_hostname == hostname)
    }

    pub fn hostname_taken(&self, hostname: &str) -> bool {
        self.devices.iter().any(|d| d.icontrol_hostname == hostname)
    }

    /// Onboard a device, creating its group in the same mutation when
    /// `new_group` is given
    pub fn onboard_device(
        &mut self,
        device: Device,
        new_group: Option<DeviceGroup>,
    ) -> Result<Device, InventoryError> {
        if self.hostname_taken(&device.icontrol_hostname) {
            return Err(InventoryError::Conflict(format!(
                "device {} is already registered",
                device.icontrol_hostname
            )));
        }

        if let Some(group) = new_group {
            self.groups.push(group);
        }

        let group_id = device.group_id.clone();
        let group = self
            .group_mut(&group_id)
            .ok_or_else(|| group_not_found(&group_id))?;
        group.devices.push(device.icontrol_hostname.clone());
        self.devices.push(device.clone());
        Ok(device)
    }

    /// Remove a device from a group, returning the remaining membership size
    pub fn remove_device(
        &mut self,
        group_id: &str,
        hostname: &str,
    ) -> Result<usize, InventoryError> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| group_not_found(group_id))?;
        let position = group
            .devices
            .iter()
            .position(|h| h == hostname)
            .ok_or_else(|| device_not_found(group_id, hostname))?;
        group.devices.remove(position);
        let remaining = group.devices.len();
        self.devices.retain(|d| d.icontrol_hostname != hostname);
        Ok(remaining)
    }

    /// Delete a group, cascading to all member devices
    pub fn delete_group(&mut self, id: &str) -> Result<Vec<Device>, InventoryError> {
        let position = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| group_not_found(id))?;
        let group = self.groups.remove(position);

        let mut removed = Vec::with_capacity(group.devices.len());
        for hostname in &group.devices {
            if let Some(index) = self
                .devices
                .iter()
                .position(|d| d.icontrol_hostname == *hostname)
            {
                removed.push(self.devices.remove(index));
            }
        }
        Ok(removed)
    }

    pub fn set_group_zone(&mut self, id: &str, zone: String) -> Result<DeviceGroup, InventoryError> {
        let group = self.group_mut(id).ok_or_else(|| group_not_found(id))?;
        group.availability_zone = Some(zone);
        Ok(group.clone())
    }

    pub fn set_admin_state(&mut self, group_id: &str, up: bool) -> Result<usize, InventoryError> {
        if self.group(group_id).is_none() {
            return Err(group_not_found(group_id));
        }
        let mut touched = 0;
        for device in self.devices.iter_mut().filter(|d| d.group_id == group_id) {
            device.admin_state_up = up;
            touched += 1;
        }
        Ok(touched)
    }

    pub fn record_refresh(
        &mut self,
        group_id: &str,
        hostname: &str,
        attributes: StatusAttributes,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Device, InventoryError> {
        if self.device(group_id, hostname).is_none() {
            return Err(device_not_found(group_id, hostname));
        }
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.icontrol_hostname == hostname)
            .ok_or_else(|| device_not_found(group_id, hostname))?;
        device.status_attributes = attributes;
        device.last_refreshed_at = Some(refreshed_at);
        Ok(device.clone())
    }

    pub fn list(&self) -> Vec<(DeviceGroup, Vec<Device>)> {
        self.groups
            .iter()
            .map(|group| {
                let members = group
                    .devices
                    .iter()
                    .filter_map(|hostname| {
                        self.devices
                            .iter()
                            .find(|d| d.icontrol_hostname == *hostname)
                    })
                    .cloned()
                    .collect();
                (group.clone(), members)
            })
            .collect()
    }
}
