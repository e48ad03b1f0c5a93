//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;
use crate::errors::{ErrorKind, InventoryError};
use crate::lifecycle::manager::{OnboardRequest, UpdateOutcome, UpdateRequest};
use crate::models::device::{Credentials, DEFAULT_ICONTROL_PORT};
use crate::query::facade::{DeviceView, GroupView};
use crate::utils::version_info;

/// Error body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Wrapper mapping inventory error kinds to HTTP status codes
pub struct ApiError(InventoryError);

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.kind().as_str(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "bigip-inventory".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

/// List all groups with their member devices
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GroupView>>, ApiError> {
    Ok(Json(state.facade.list().await?))
}

/// Show one group
pub async fn show_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GroupView>, ApiError> {
    Ok(Json(state.facade.show(&id).await?))
}

/// Device onboarding request.
///
/// No `Debug` derive: carries credential material.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub id: Option<String>,
    pub availability_zone: Option<String>,
    pub icontrol_hostname: String,
    pub icontrol_username: String,
    pub icontrol_password: String,
    #[serde(default = "default_port")]
    pub icontrol_port: u16,
}

fn default_port() -> u16 {
    DEFAULT_ICONTROL_PORT
}

/// Onboard a device
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<DeviceView>), ApiError> {
    let device = state
        .manager
        .onboard(OnboardRequest {
            group_id: request.id,
            availability_zone: request.availability_zone,
            icontrol_hostname: request.icontrol_hostname,
            credentials: Credentials::new(request.icontrol_username, request.icontrol_password),
            icontrol_port: request.icontrol_port,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DeviceView::from(&device))))
}

/// Group mutation request
#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    pub admin_state_up: Option<bool>,
    pub availability_zone: Option<String>,
}

/// Update a group's admin state and/or default availability zone
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let outcome = state
        .manager
        .update(
            &id,
            UpdateRequest {
                admin_state: request.admin_state_up,
                availability_zone: request.availability_zone,
            },
        )
        .await?;
    Ok(Json(outcome))
}

/// Removal receipt
#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub group_id: String,
    pub devices_removed: usize,
}

/// Delete a group and all member devices
pub async fn delete_group_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let devices_removed = state.manager.remove(&id, None).await?;
    Ok(Json(RemoveResponse {
        group_id: id,
        devices_removed,
    }))
}

/// Remove one device from a group
pub async fn delete_device_handler(
    State(state): State<Arc<AppState>>,
    Path((id, hostname)): Path<(String, String)>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let devices_removed = state.manager.remove(&id, Some(&hostname)).await?;
    Ok(Json(RemoveResponse {
        group_id: id,
        devices_removed,
    }))
}

/// Refresh one device from the live appliance
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    Path((id, hostname)): Path<(String, String)>,
) -> Result<Json<DeviceView>, ApiError> {
    let device = state.engine.refresh(&id, &hostname).await?;
    Ok(Json(DeviceView::from(&device)))
}
