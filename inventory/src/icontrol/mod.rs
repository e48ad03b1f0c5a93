//! Appliance query interface

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::InventoryError;
use crate::models::device::{Credentials, Device, StatusAttributes};

pub mod client;

/// Failure tagged per the appliance contract: the probe either could not
/// reach the device or the device rejected the stored credentials.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Unreachable: {0}")]
    Unreachable(String),
}

impl From<QueryError> for InventoryError {
    fn from(err: QueryError) -> Self {
        InventoryError::UpstreamUnavailable(err.to_string())
    }
}

/// Probe target for a single appliance
#[derive(Debug, Clone)]
pub struct ApplianceTarget {
    pub hostname: String,
    pub port: u16,
    pub credentials: Credentials,
}

impl From<&Device> for ApplianceTarget {
    fn from(device: &Device) -> Self {
        Self {
            hostname: device.icontrol_hostname.clone(),
            port: device.icontrol_port,
            credentials: device.credentials.clone(),
        }
    }
}

/// Appliance query capability consumed by the reconciliation engine
#[async_trait]
pub trait ApplianceQuery: Send + Sync {
    /// Query a snapshot of live device status attributes
    async fn query_status(&self, target: &ApplianceTarget)
        -> Result<StatusAttributes, QueryError>;
}
