//! Command-line options

use std::collections::HashMap;

use crate::errors::InventoryError;
use crate::models::device::DEFAULT_ICONTROL_PORT;

/// A parsed CLI invocation.
///
/// No `Debug` derive: `Create` carries credential material.
pub enum Command {
    Create {
        group_id: Option<String>,
        availability_zone: Option<String>,
        icontrol_hostname: String,
        icontrol_username: String,
        icontrol_password: String,
        icontrol_port: u16,
    },
    Delete {
        group_id: String,
        icontrol_hostname: Option<String>,
    },
    Update {
        group_id: String,
        admin_state: Option<bool>,
        availability_zone: Option<String>,
    },
    Refresh {
        group_id: String,
        icontrol_hostname: String,
    },
    List,
    Show {
        group_id: String,
    },
    Serve {
        host: Option<String>,
        port: Option<u16>,
    },
    Version,
}

/// Options that may appear in bare `--flag` form; everything else must
/// carry a value
const BOOLEAN_FLAGS: &[&str] = &["admin-state-up", "admin-state-down", "version"];

/// Parse command-line arguments into a command.
///
/// Arguments follow the `<command> --key=value` convention; only the
/// known boolean flags may be passed bare.
pub fn parse(args: &[String]) -> Result<Command, InventoryError> {
    let mut command: Option<&str> = None;
    let mut options: HashMap<String, String> = HashMap::new();

    for arg in args {
        if let Some(rest) = arg.strip_prefix("--") {
            if let Some((key, value)) = rest.split_once('=') {
                options.insert(key.to_string(), value.to_string());
            } else if BOOLEAN_FLAGS.contains(&rest) {
                options.insert(rest.to_string(), "true".to_string());
            } else {
                return Err(InventoryError::InvalidArgument(format!(
                    "option --{rest} requires a value"
                )));
            }
        } else if command.is_none() {
            command = Some(arg);
        } else {
            return Err(InventoryError::InvalidArgument(format!(
                "unexpected argument: {arg}"
            )));
        }
    }

    if command.is_none() && options.contains_key("version") {
        return Ok(Command::Version);
    }

    let command = command.ok_or_else(|| {
        InventoryError::InvalidArgument(
            "no command given; expected one of create, delete, update, refresh, list, show, serve"
                .to_string(),
        )
    })?;

    match command {
        "create" => {
            let icontrol_port = match options.get("icontrol-port") {
                Some(raw) => raw.parse::<u16>().map_err(|_| {
                    InventoryError::InvalidArgument(format!("malformed port: {raw}"))
                })?,
                None => DEFAULT_ICONTROL_PORT,
            };
            Ok(Command::Create {
                group_id: options.get("id").cloned(),
                availability_zone: options.get("availability-zone").cloned(),
                icontrol_hostname: require(&options, "icontrol-hostname")?,
                icontrol_username: require(&options, "icontrol-username")?,
                icontrol_password: require(&options, "icontrol-password")?,
                icontrol_port,
            })
        }
        "delete" => Ok(Command::Delete {
            group_id: require(&options, "id")?,
            icontrol_hostname: options.get("icontrol-hostname").cloned(),
        }),
        "update" => {
            let down = options.contains_key("admin-state-down");
            let up = options.contains_key("admin-state-up");
            if down && up {
                return Err(InventoryError::InvalidArgument(
                    "admin-state-up and admin-state-down are mutually exclusive".to_string(),
                ));
            }
            let admin_state = if down {
                Some(false)
            } else if up {
                Some(true)
            } else {
                None
            };
            Ok(Command::Update {
                group_id: require(&options, "id")?,
                admin_state,
                availability_zone: options.get("availability-zone").cloned(),
            })
        }
        "refresh" => Ok(Command::Refresh {
            group_id: require(&options, "id")?,
            icontrol_hostname: require(&options, "icontrol-hostname")?,
        }),
        "list" => Ok(Command::List),
        "show" => Ok(Command::Show {
            group_id: require(&options, "id")?,
        }),
        "serve" => {
            let port = match options.get("port") {
                Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                    InventoryError::InvalidArgument(format!("malformed port: {raw}"))
                })?),
                None => None,
            };
            Ok(Command::Serve {
                host: options.get("host").cloned(),
                port,
            })
        }
        other => Err(InventoryError::InvalidArgument(format!(
            "unknown command: {other}"
        ))),
    }
}

fn require(options: &HashMap<String, String>, key: &str) -> Result<String, InventoryError> {
    options.get(key).cloned().ok_or_else(|| {
        InventoryError::InvalidArgument(format!("missing required argument: --{key}"))
    })
}
