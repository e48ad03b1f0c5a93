//! BIG-IP Inventory - Entry Point
//!
//! Registers BIG-IP appliances into device groups and keeps their recorded
//! state reconciled against the live management API.

use std::env;

use bigip_inventory::app::options::parse;
use bigip_inventory::app::run::run;
use bigip_inventory::logs::{init_logging, LogOptions};
use bigip_inventory::storage::layout::StorageLayout;
use bigip_inventory::storage::settings::Settings;

use tracing::error;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let command = match parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let layout = StorageLayout::default();
    let settings = match Settings::load(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(command, &settings, &layout).await {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
