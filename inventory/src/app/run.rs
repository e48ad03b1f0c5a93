//! Command execution

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::app::options::Command;
use crate::app::state::AppState;
use crate::errors::InventoryError;
use crate::lifecycle::manager::{OnboardRequest, UpdateRequest};
use crate::models::device::Credentials;
use crate::query::facade::DeviceView;
use crate::server::serve::serve;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::utils::version_info;

/// Execute a parsed command, printing its JSON result to stdout
pub async fn run(
    command: Command,
    settings: &Settings,
    layout: &StorageLayout,
) -> Result<(), InventoryError> {
    match command {
        Command::Version => print_json(&version_info()),

        Command::Serve { host, port } => {
            let state = Arc::new(AppState::init(settings, layout)?);
            let mut server_settings = settings.server.clone();
            if let Some(host) = host {
                server_settings.host = host;
            }
            if let Some(port) = port {
                server_settings.port = port;
            }
            serve(&server_settings, state, await_shutdown_signal()).await
        }

        Command::Create {
            group_id,
            availability_zone,
            icontrol_hostname,
            icontrol_username,
            icontrol_password,
            icontrol_port,
        } => {
            let state = AppState::init(settings, layout)?;
            let device = state
                .manager
                .onboard(OnboardRequest {
                    group_id,
                    availability_zone,
                    icontrol_hostname,
                    credentials: Credentials::new(icontrol_username, icontrol_password),
                    icontrol_port,
                })
                .await?;
            print_json(&DeviceView::from(&device))
        }

        Command::Delete {
            group_id,
            icontrol_hostname,
        } => {
            let state = AppState::init(settings, layout)?;
            let devices_removed = state
                .manager
                .remove(&group_id, icontrol_hostname.as_deref())
                .await?;
            print_json(&json!({
                "group_id": group_id,
                "devices_removed": devices_removed,
            }))
        }

        Command::Update {
            group_id,
            admin_state,
            availability_zone,
        } => {
            let state = AppState::init(settings, layout)?;
            let outcome = state
                .manager
                .update(
                    &group_id,
                    UpdateRequest {
                        admin_state,
                        availability_zone,
                    },
                )
                .await?;
            print_json(&outcome)
        }

        Command::Refresh {
            group_id,
            icontrol_hostname,
        } => {
            let state = AppState::init(settings, layout)?;
            let device = state.engine.refresh(&group_id, &icontrol_hostname).await?;
            print_json(&DeviceView::from(&device))
        }

        Command::List => {
            let state = AppState::init(settings, layout)?;
            print_json(&state.facade.list().await?)
        }

        Command::Show { group_id } => {
            let state = AppState::init(settings, layout)?;
            print_json(&state.facade.show(&group_id).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), InventoryError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down...");
        }
    }
}
