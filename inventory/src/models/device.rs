//! Device inventory record

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Default iControl management port
pub const DEFAULT_ICONTROL_PORT: u16 = 443;

/// Status attributes as last observed from the appliance, replaced
/// wholesale on each successful refresh.
pub type StatusAttributes = BTreeMap<String, serde_json::Value>;

/// iControl credentials, write-once after onboarding.
///
/// The password is wrapped in `SecretString` so it is redacted from `Debug`
/// output and never leaves the process except through the durable-store
/// serialization below. List/show views never include credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub icontrol_username: String,
    icontrol_password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            icontrol_username: username.into(),
            icontrol_password: SecretString::from(password.into()),
        }
    }

    pub fn icontrol_password(&self) -> &SecretString {
        &self.icontrol_password
    }
}

// Explicit impl rather than derive: the secret is exposed only here, at the
// store boundary. The inventory file is written with mode 0600.
impl Serialize for Credentials {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Credentials", 2)?;
        state.serialize_field("icontrol_username", &self.icontrol_username)?;
        state.serialize_field("icontrol_password", self.icontrol_password.expose_secret())?;
        state.end()
    }
}

/// A registered BIG-IP appliance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Owning group; a device belongs to exactly one group
    pub group_id: String,

    /// Management hostname, unique across the entire inventory
    pub icontrol_hostname: String,

    /// iControl credentials
    pub credentials: Credentials,

    /// Management port
    #[serde(default = "default_port")]
    pub icontrol_port: u16,

    /// Whether the device is administratively enabled
    #[serde(default = "default_admin_state")]
    pub admin_state_up: bool,

    /// Availability zone, defaulted from the group at onboarding time
    #[serde(default)]
    pub availability_zone: Option<String>,

    /// Timestamp of the last successful reconciliation
    #[serde(default)]
    pub last_refreshed_at: Option<DateTime<Utc>>,

    /// Last observed appliance status snapshot
    #[serde(default)]
    pub status_attributes: StatusAttributes,

    /// Onboarding timestamp
    pub created_at: DateTime<Utc>,
}

fn default_port() -> u16 {
    DEFAULT_ICONTROL_PORT
}

fn default_admin_state() -> bool {
    true
}

impl Device {
    /// Create a new device record for onboarding
    pub fn new(
        group_id: impl Into<String>,
        hostname: impl Into<String>,
        credentials: Credentials,
        port: u16,
        availability_zone: Option<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            icontrol_hostname: hostname.into(),
            credentials,
            icontrol_port: port,
            admin_state_up: true,
            availability_zone,
            last_refreshed_at: None,
            status_attributes: StatusAttributes::new(),
            created_at: Utc::now(),
        }
    }
}
