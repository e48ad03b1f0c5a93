//! Shared test fixtures

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use bigip_inventory::app::state::AppState;
use bigip_inventory::icontrol::{ApplianceQuery, ApplianceTarget, QueryError};
use bigip_inventory::lifecycle::manager::OnboardRequest;
use bigip_inventory::models::device::{Credentials, StatusAttributes, DEFAULT_ICONTROL_PORT};
use bigip_inventory::store::memory::MemoryStore;

/// Query stub that always returns the same snapshot
pub struct OkQuery {
    pub attributes: StatusAttributes,
}

#[async_trait]
impl ApplianceQuery for OkQuery {
    async fn query_status(
        &self,
        _target: &ApplianceTarget,
    ) -> Result<StatusAttributes, QueryError> {
        Ok(self.attributes.clone())
    }
}

/// Query stub that always fails
pub struct FailQuery {
    pub auth_failure: bool,
}

#[async_trait]
impl ApplianceQuery for FailQuery {
    async fn query_status(
        &self,
        target: &ApplianceTarget,
    ) -> Result<StatusAttributes, QueryError> {
        if self.auth_failure {
            Err(QueryError::AuthenticationFailed(format!(
                "{} rejected credentials",
                target.hostname
            )))
        } else {
            Err(QueryError::Unreachable(format!(
                "{} connection refused",
                target.hostname
            )))
        }
    }
}

/// Query stub that never answers within a test-sized timeout
pub struct HangQuery;

#[async_trait]
impl ApplianceQuery for HangQuery {
    async fn query_status(
        &self,
        _target: &ApplianceTarget,
    ) -> Result<StatusAttributes, QueryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(StatusAttributes::new())
    }
}

/// Wire an app over a fresh in-memory store and the given query stub
pub fn app_with_query(query: Arc<dyn ApplianceQuery>) -> (AppState, Arc<MemoryStore>) {
    app_with_query_and_timeout(query, Duration::from_secs(5))
}

pub fn app_with_query_and_timeout(
    query: Arc<dyn ApplianceQuery>,
    probe_timeout: Duration,
) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_parts(store.clone(), query, probe_timeout);
    (state, store)
}

/// Wire an app whose upstream never gets queried
pub fn app() -> (AppState, Arc<MemoryStore>) {
    app_with_query(Arc::new(FailQuery {
        auth_failure: false,
    }))
}

/// Onboarding request with test credentials
pub fn onboard_request(group_id: Option<&str>, hostname: &str) -> OnboardRequest {
    OnboardRequest {
        group_id: group_id.map(|id| id.to_string()),
        availability_zone: None,
        icontrol_hostname: hostname.to_string(),
        credentials: Credentials::new("admin", "secret"),
        icontrol_port: DEFAULT_ICONTROL_PORT,
    }
}

/// A small status snapshot as a live probe would return it
pub fn status_snapshot(version: &str) -> StatusAttributes {
    let mut attributes = StatusAttributes::new();
    attributes.insert("version".to_string(), version.into());
    attributes.insert("failoverState".to_string(), "active".into());
    attributes
}
