//! Device lifecycle manager

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::errors::InventoryError;
use crate::models::device::{Credentials, Device};
use crate::models::group::DeviceGroup;
use crate::registry::groups::GroupRegistry;
use crate::store::InventoryStore;

/// Onboarding parameters.
///
/// No `Debug` derive: the request carries credentials.
pub struct OnboardRequest {
    /// Existing group to join; a new group is created when omitted
    pub group_id: Option<String>,

    /// Zone for a newly created group; ignored when joining an existing one
    pub availability_zone: Option<String>,

    pub icontrol_hostname: String,
    pub credentials: Credentials,
    pub icontrol_port: u16,
}

/// Admin-state / zone mutation request. At least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// `Some(false)` for admin-state-down, `Some(true)` for admin-state-up;
    /// `None` leaves the admin state untouched
    pub admin_state: Option<bool>,

    /// New default availability zone for the group; does not retroactively
    /// change member devices
    pub availability_zone: Option<String>,
}

/// Result of an update operation
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub group: DeviceGroup,
    pub devices_updated: usize,
}

/// Owns per-device onboarding, removal, and administrative mutation
pub struct DeviceLifecycleManager {
    store: Arc<dyn InventoryStore>,
    registry: Arc<GroupRegistry>,
}

impl DeviceLifecycleManager {
    pub fn new(store: Arc<dyn InventoryStore>, registry: Arc<GroupRegistry>) -> Self {
        Self { store, registry }
    }

    /// Register a new device, creating its group when no group id is given.
    ///
    /// Fails with `Conflict` when the hostname is registered anywhere in the
    /// inventory. Device and group membership persist atomically.
    pub async fn onboard(&self, request: OnboardRequest) -> Result<Device, InventoryError> {
        let resolved = self
            .registry
            .resolve_or_create(request.group_id.as_deref(), request.availability_zone)
            .await?;

        // Zone is a creation-time default from the group, not a live link
        let device = Device::new(
            resolved.group.id.clone(),
            request.icontrol_hostname,
            request.credentials,
            request.icontrol_port,
            resolved.group.availability_zone.clone(),
        );

        let new_group = resolved.newly_created.then_some(resolved.group);
        let device = self.store.onboard_device(device, new_group).await?;

        info!(
            "Onboarded device {} into group {}",
            device.icontrol_hostname, device.group_id
        );
        Ok(device)
    }

    /// Remove a single device (auto-deleting an emptied group), or the whole
    /// group with all member devices when no hostname is given.
    ///
    /// Returns the number of devices removed.
    pub async fn remove(
        &self,
        group_id: &str,
        hostname: Option<&str>,
    ) -> Result<usize, InventoryError> {
        match hostname {
            Some(hostname) => {
                self.registry.remove_device_ref(group_id, hostname).await?;
                Ok(1)
            }
            None => {
                let removed = self.registry.delete(group_id).await?;
                Ok(removed.len())
            }
        }
    }

    /// Apply admin-state and/or zone mutations to a group.
    ///
    /// Admin state applies to every current member device of the group;
    /// the zone sets the group-level default only. Fails with
    /// `InvalidArgument` when neither mutation is supplied.
    pub async fn update(
        &self,
        group_id: &str,
        request: UpdateRequest,
    ) -> Result<UpdateOutcome, InventoryError> {
        if request.admin_state.is_none() && request.availability_zone.is_none() {
            return Err(InventoryError::InvalidArgument(
                "update requires at least one of admin-state or availability-zone".to_string(),
            ));
        }

        let mut group = self
            .store
            .get_group(group_id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("device group {group_id}")))?;

        let mut devices_updated = 0;
        if let Some(up) = request.admin_state {
            devices_updated = self.store.set_admin_state(group_id, up).await?;
            info!(
                "Set admin_state_up={} for {} device(s) in group {}",
                up, devices_updated, group_id
            );
        }

        if let Some(zone) = request.availability_zone {
            group = self.store.set_group_zone(group_id, zone).await?;
            info!("Set availability zone for group {}", group_id);
        }

        Ok(UpdateOutcome {
            group,
            devices_updated,
        })
    }
}
