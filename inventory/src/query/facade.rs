//! Query façade serving list and show

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::InventoryError;
use crate::models::device::{Device, StatusAttributes};
use crate::models::group::DeviceGroup;
use crate::store::InventoryStore;

/// Credential-free view of a device
#[derive(Debug, Clone, Serialize)]
pub struct DeviceView {
    pub group_id: String,
    pub icontrol_hostname: String,
    pub icontrol_port: u16,
    pub admin_state_up: bool,
    pub availability_zone: Option<String>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub status_attributes: StatusAttributes,
    pub created_at: DateTime<Utc>,
}

impl From<&Device> for DeviceView {
    fn from(device: &Device) -> Self {
        Self {
            group_id: device.group_id.clone(),
            icontrol_hostname: device.icontrol_hostname.clone(),
            icontrol_port: device.icontrol_port,
            admin_state_up: device.admin_state_up,
            availability_zone: device.availability_zone.clone(),
            last_refreshed_at: device.last_refreshed_at,
            status_attributes: device.status_attributes.clone(),
            created_at: device.created_at,
        }
    }
}

/// A group with its member devices
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: String,
    pub availability_zone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub devices: Vec<DeviceView>,
}

impl GroupView {
    fn build(group: &DeviceGroup, members: &[Device]) -> Self {
        Self {
            id: group.id.clone(),
            availability_zone: group.availability_zone.clone(),
            created_at: group.created_at,
            devices: members.iter().map(DeviceView::from).collect(),
        }
    }
}

/// Read-through façade over the group registry and device records
pub struct QueryFacade {
    store: Arc<dyn InventoryStore>,
}

impl QueryFacade {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// All groups with their member devices, in stable creation order
    pub async fn list(&self) -> Result<Vec<GroupView>, InventoryError> {
        let groups = self.store.list().await?;
        Ok(groups
            .iter()
            .map(|(group, members)| GroupView::build(group, members))
            .collect())
    }

    /// One group with its member devices
    pub async fn show(&self, group_id: &str) -> Result<GroupView, InventoryError> {
        let groups = self.store.list().await?;
        groups
            .iter()
            .find(|(group, _)| group.id == group_id)
            .map(|(group, members)| GroupView::build(group, members))
            .ok_or_else(|| InventoryError::NotFound(format!("device group {group_id}")))
    }
}
