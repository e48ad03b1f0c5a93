//! Group registry

use std::sync::Arc;

use tracing::info;

use crate::errors::InventoryError;
use crate::models::device::Device;
use crate::models::group::DeviceGroup;
use crate::store::InventoryStore;

/// A group resolved for onboarding.
///
/// A freshly created group is not yet persisted; it commits atomically
/// together with its first device, so a failed onboard never leaves an
/// empty group behind.
#[derive(Debug, Clone)]
pub struct ResolvedGroup {
    pub group: DeviceGroup,
    pub newly_created: bool,
}

/// Owns the set of device groups
pub struct GroupRegistry {
    store: Arc<dyn InventoryStore>,
}

impl GroupRegistry {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Look up an existing group by id, or stage a new one when no id is
    /// given
    pub async fn resolve_or_create(
        &self,
        id: Option<&str>,
        availability_zone: Option<String>,
    ) -> Result<ResolvedGroup, InventoryError> {
        match id {
            Some(id) => {
                let group = self
                    .store
                    .get_group(id)
                    .await?
                    .ok_or_else(|| InventoryError::NotFound(format!("device group {id}")))?;
                Ok(ResolvedGroup {
                    group,
                    newly_created: false,
                })
            }
            None => {
                let group = DeviceGroup::new(availability_zone);
                info!("Creating device group {}", group.id);
                Ok(ResolvedGroup {
                    group,
                    newly_created: true,
                })
            }
        }
    }

    /// Delete a group, cascading to every member device
    pub async fn delete(&self, id: &str) -> Result<Vec<Device>, InventoryError> {
        let removed = self.store.delete_group(id).await?;
        for device in &removed {
            info!("Removed device {} from group {}", device.icontrol_hostname, id);
        }
        info!("Deleted device group {}", id);
        Ok(removed)
    }

    /// Whether a group currently has no members
    pub async fn is_empty(&self, id: &str) -> Result<bool, InventoryError> {
        let group = self
            .store
            .get_group(id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("device group {id}")))?;
        Ok(group.is_empty())
    }

    /// Drop a device reference from a group's membership, auto-deleting the
    /// group when membership reaches zero
    pub async fn remove_device_ref(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<(), InventoryError> {
        let remaining = self.store.remove_device(group_id, hostname).await?;
        info!("Removed device {} from group {}", hostname, group_id);

        if remaining == 0 {
            info!("Group {} is now empty, deleting", group_id);
            self.store.delete_group(group_id).await?;
        }
        Ok(())
    }
}
