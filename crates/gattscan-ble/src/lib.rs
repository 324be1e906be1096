//! BLE scan-and-enumerate engine
//!
//! This crate drives a single scan-and-enumerate run over btleplug: discover
//! devices for a fixed window, connect to every device whose advertised name
//! matches the configured target, print its GATT services and
//! characteristics, and disconnect.
//!
//! ## Architecture
//!
//! - [`config`] - run configuration
//! - [`error`] - error types for the scan engine
//! - [`registry`] - in-flight connection bookkeeping
//! - [`discovery`] - adapter selection, scanning, and run orchestration
//! - `worker` / `session` - per-device connection worker and its GATT session
//!
//! Device sessions are fully serialized: a global gate admits one
//! connect/discover/disconnect sequence at a time, and the scan controller
//! holds that gate until the scan window closes. The controller joins every
//! worker before [`ScanController::run`] returns.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gattscan_ble::{ScanConfig, ScanController};
//!
//! # async fn example() -> Result<(), gattscan_ble::ScanError> {
//! let config = ScanConfig::new().with_target_name("Local".to_string());
//! let summary = ScanController::new(config).run().await?;
//! println!(
//!     "{} discovered, {} matched, {} sessions",
//!     summary.discovered, summary.matched, summary.sessions
//! );
//! # Ok(())
//! # }
//! ```

mod config;
mod discovery;
mod error;
mod registry;
mod session;
mod worker;

// Public API exports
pub use config::ScanConfig;
pub use discovery::{ScanController, ScanSummary};
pub use error::{Result, ScanError};
pub use registry::{ConnectionRecord, ConnectionRegistry};
pub use session::SessionOutcome;
