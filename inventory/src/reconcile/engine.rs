//! Reconciliation engine

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::InventoryError;
use crate::icontrol::{ApplianceQuery, ApplianceTarget};
use crate::models::device::Device;
use crate::store::InventoryStore;

/// Reconciliation options
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Upper bound on a single upstream probe. A timed-out probe is treated
    /// identically to an unreachable appliance.
    pub probe_timeout: Duration,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives the refresh operation: probe the live appliance and reconcile the
/// stored record against the returned snapshot.
pub struct ReconciliationEngine {
    store: Arc<dyn InventoryStore>,
    query: Arc<dyn ApplianceQuery>,
    options: ReconcileOptions,
}

impl ReconciliationEngine {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        query: Arc<dyn ApplianceQuery>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            store,
            query,
            options,
        }
    }

    /// Refresh one device's status attributes from the live appliance.
    ///
    /// On a failed or timed-out probe the stored record is left untouched;
    /// stale data stays distinguishable via the unchanged
    /// `last_refreshed_at`. No retries. Never mutates admin state,
    /// credentials, or membership.
    pub async fn refresh(
        &self,
        group_id: &str,
        hostname: &str,
    ) -> Result<Device, InventoryError> {
        if self.store.get_group(group_id).await?.is_none() {
            return Err(InventoryError::NotFound(format!("device group {group_id}")));
        }
        let device = self
            .store
            .get_device(group_id, hostname)
            .await?
            .ok_or_else(|| {
                InventoryError::NotFound(format!("device {hostname} in group {group_id}"))
            })?;

        let target = ApplianceTarget::from(&device);
        let probe = self.query.query_status(&target);
        let attributes = match tokio::time::timeout(self.options.probe_timeout, probe).await {
            Ok(Ok(attributes)) => attributes,
            Ok(Err(e)) => {
                warn!("Refresh probe for {} failed: {}", hostname, e);
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    "Refresh probe for {} timed out after {:?}",
                    hostname, self.options.probe_timeout
                );
                return Err(InventoryError::UpstreamUnavailable(format!(
                    "probe of {hostname} timed out after {:?}",
                    self.options.probe_timeout
                )));
            }
        };

        let device = self
            .store
            .record_refresh(group_id, hostname, attributes, Utc::now())
            .await?;
        info!("Refreshed device {} in group {}", hostname, group_id);
        Ok(device)
    }
}
