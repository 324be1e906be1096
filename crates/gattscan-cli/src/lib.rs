//! gattscan CLI library
//!
//! Argument parsing, configuration loading, and error types for the
//! `gattscan` binary.

pub mod cli;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::AppConfig;
pub use error::{CliError, Result};
