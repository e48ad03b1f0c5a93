//! Settings file management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::InventoryError;
use crate::filesys::file::File;
use crate::icontrol::client::IControlOptions;
use crate::logs::LogLevel;

/// Service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// iControl probe configuration
    #[serde(default)]
    pub icontrol: IControlSettings,

    /// Local HTTP API configuration
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings, falling back to defaults when no file exists
    pub async fn load(file: &File) -> Result<Self, InventoryError> {
        if !file.exists().await {
            return Ok(Self::default());
        }
        file.read_json().await
    }
}

/// iControl probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IControlSettings {
    /// Timeout for one refresh probe, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Verify the appliance TLS certificate
    #[serde(default)]
    pub verify_tls: bool,
}

fn default_probe_timeout_secs() -> u64 {
    30
}

impl Default for IControlSettings {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout_secs(),
            verify_tls: false,
        }
    }
}

impl IControlSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn client_options(&self) -> IControlOptions {
        IControlOptions {
            timeout: self.probe_timeout(),
            verify_tls: self.verify_tls,
        }
    }
}

/// Local HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind host
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8100
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}
