//! iControl REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, error};

use crate::errors::InventoryError;
use crate::icontrol::{ApplianceQuery, ApplianceTarget, QueryError};
use crate::models::device::StatusAttributes;

/// iControl client options
#[derive(Debug, Clone)]
pub struct IControlOptions {
    /// Per-request timeout
    pub timeout: Duration,

    /// Verify the appliance TLS certificate. BIG-IPs commonly run with a
    /// self-signed management certificate, so this defaults to off.
    pub verify_tls: bool,
}

impl Default for IControlOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_tls: false,
        }
    }
}

/// HTTPS client for the BIG-IP iControl REST management API
pub struct IControlClient {
    client: Client,
}

impl IControlClient {
    /// Create a new iControl client
    pub fn new(options: &IControlOptions) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.verify_tls)
            .build()
            .map_err(|e| InventoryError::Internal(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ApplianceQuery for IControlClient {
    async fn query_status(
        &self,
        target: &ApplianceTarget,
    ) -> Result<StatusAttributes, QueryError> {
        let url = format!(
            "https://{}:{}/mgmt/tm/cm/device",
            target.hostname, target.port
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &target.credentials.icontrol_username,
                Some(target.credentials.icontrol_password().expose_secret()),
            )
            .send()
            .await
            .map_err(|e| QueryError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(QueryError::AuthenticationFailed(format!(
                "{} rejected credentials ({})",
                target.hostname, status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("iControl query failed: {} - {}", status, body);
            return Err(QueryError::Unreachable(format!("{}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| QueryError::Unreachable(e.to_string()))?;

        Ok(flatten_device_entry(&body, &target.hostname))
    }
}

/// Pick the self-device entry out of the `cm/device` collection response and
/// flatten its scalar fields into status attributes.
fn flatten_device_entry(body: &Value, hostname: &str) -> StatusAttributes {
    let items = body.get("items").and_then(Value::as_array);
    let entry = items
        .and_then(|items| {
            items
                .iter()
                .find(|i| i.get("selfDevice").and_then(Value::as_str) == Some("true"))
                .or_else(|| {
                    items
                        .iter()
                        .find(|i| i.get("managementIp").and_then(Value::as_str) == Some(hostname))
                })
                .or_else(|| items.first())
        })
        .unwrap_or(body);

    let mut attributes = StatusAttributes::new();
    if let Some(object) = entry.as_object() {
        for (key, value) in object {
            // Collection plumbing, not device state
            if matches!(key.as_str(), "kind" | "selfLink" | "fullPath" | "generation") {
                continue;
            }
            if value.is_string() || value.is_number() || value.is_boolean() {
                attributes.insert(key.clone(), value.clone());
            }
        }
    }
    attributes
}
