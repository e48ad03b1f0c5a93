//! Device group record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A collection of devices sharing administrative grouping and a default
/// availability zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceGroup {
    /// Opaque unique identifier, never reused
    pub id: String,

    /// Default availability zone applied to devices at onboarding time
    #[serde(default)]
    pub availability_zone: Option<String>,

    /// Member device hostnames, in onboarding order
    #[serde(default)]
    pub devices: Vec<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl DeviceGroup {
    /// Create a new group with a freshly generated id
    pub fn new(availability_zone: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            availability_zone,
            devices: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.devices.iter().any(|h| h == hostname)
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
