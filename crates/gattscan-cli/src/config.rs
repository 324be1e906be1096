//! gattscan configuration management
//!
//! Configuration is loaded from an optional TOML file and overridden by
//! command-line arguments (CLI wins).

use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gattscan_ble::ScanConfig;

use crate::cli::Cli;
use crate::error::Result;

// ----------------------------------------------------------------------------
// Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the gattscan application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan engine configuration
    pub scan: ScanConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Merge command-line arguments over file values and return the scan
    /// configuration for the run
    pub fn merge_cli(mut self, cli: &Cli) -> ScanConfig {
        if let Some(adapter) = &cli.adapter {
            self.scan.adapter_name = Some(adapter.clone());
        }
        if let Some(name) = &cli.name {
            self.scan.target_name = Some(name.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.scan.scan_timeout = Duration::from_secs(timeout);
        }
        self.scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_match_the_engine_defaults() {
        let config = AppConfig::default();
        assert!(config.scan.adapter_name.is_none());
        assert!(config.scan.target_name.is_none());
        assert_eq!(config.scan.scan_timeout, Duration::from_secs(10));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scan]
            target_name = "Local"
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.target_name.as_deref(), Some("Local"));
        assert!(config.scan.adapter_name.is_none());
        assert_eq!(config.scan.scan_timeout, Duration::from_secs(10));
    }

    #[test]
    fn full_toml_round_trips() {
        let config: AppConfig = toml::from_str(
            r#"
            [scan]
            adapter_name = "hci1"
            target_name = "Local"
            scan_timeout = { secs = 3, nanos = 0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.adapter_name.as_deref(), Some("hci1"));
        assert_eq!(config.scan.scan_timeout, Duration::from_secs(3));
    }

    #[test]
    fn cli_arguments_win_over_file_values() {
        let config: AppConfig = toml::from_str(
            r#"
            [scan]
            adapter_name = "hci0"
            target_name = "FromFile"
            "#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["gattscan", "hci1", "--name", "Local", "-t", "2"]).unwrap();
        let scan = config.merge_cli(&cli);

        assert_eq!(scan.adapter_name.as_deref(), Some("hci1"));
        assert_eq!(scan.target_name.as_deref(), Some("Local"));
        assert_eq!(scan.scan_timeout, Duration::from_secs(2));
    }

    #[test]
    fn bare_cli_keeps_file_values() {
        let config: AppConfig = toml::from_str(
            r#"
            [scan]
            target_name = "Local"
            "#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["gattscan"]).unwrap();
        let scan = config.merge_cli(&cli);

        assert_eq!(scan.target_name.as_deref(), Some("Local"));
        assert!(scan.adapter_name.is_none());
    }
}
