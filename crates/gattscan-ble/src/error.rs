//! Error types for the scan engine

use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors reported by the scan engine
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No BLE adapters available")]
    NoAdapter,

    #[error("No BLE adapter matching '{name}'")]
    AdapterNotFound { name: String },

    #[error("Failed to open BLE adapter: {0}")]
    AdapterOpen(String),

    #[error("Failed to scan: {0}")]
    ScanFailed(String),

    #[error("Failed to connect to the bluetooth device '{address}': {reason}")]
    ConnectFailed { address: String, reason: String },

    #[error("Failed to discover services on '{address}': {reason}")]
    ServiceDiscovery { address: String, reason: String },

    #[error("Failed to disconnect from the bluetooth device '{address}': {reason}")]
    Disconnect { address: String, reason: String },
}

/// Result type for scan engine operations
pub type Result<T> = std::result::Result<T, ScanError>;
