//! Error types for the inventory service

use thiserror::Error;

/// Main error type for inventory operations
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classification, stable across releases.
///
/// Callers (CLI exit codes, HTTP status mapping, scripts) branch on the
/// kind, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    UpstreamUnavailable,
    StoreUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

impl InventoryError {
    /// Classify this error for exit-code / status-code mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::NotFound(_) => ErrorKind::NotFound,
            InventoryError::Conflict(_) => ErrorKind::Conflict,
            InventoryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            InventoryError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            InventoryError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            InventoryError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Process exit code for the CLI front end
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidArgument => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Conflict => 4,
            ErrorKind::UpstreamUnavailable => 5,
            ErrorKind::StoreUnavailable => 6,
            ErrorKind::Internal => 1,
        }
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::StoreUnavailable(err.to_string())
    }
}

impl From<anyhow::Error> for InventoryError {
    fn from(err: anyhow::Error) -> Self {
        InventoryError::Internal(err.to_string())
    }
}
