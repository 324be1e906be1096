//! Scan configuration

use std::time::Duration;

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Configuration for a scan-and-enumerate run
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Local adapter to scan with; `None` selects the system default
    pub adapter_name: Option<String>,
    /// Advertised name a device must match exactly to be connected to.
    /// `None` accepts nothing: devices are printed but never connected.
    pub target_name: Option<String>,
    /// Fixed duration of the discovery scan window
    pub scan_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            adapter_name: None,
            target_name: None,
            scan_timeout: Duration::from_secs(10),
        }
    }
}

impl ScanConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the adapter to scan with
    pub fn with_adapter_name(mut self, name: impl Into<String>) -> Self {
        self.adapter_name = Some(name.into());
        self
    }

    /// Set the device name to connect to
    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Set the scan window duration
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_nothing() {
        let config = ScanConfig::default();
        assert!(config.adapter_name.is_none());
        assert!(config.target_name.is_none());
        assert_eq!(config.scan_timeout, Duration::from_secs(10));
    }

    #[test]
    fn builders_chain() {
        let config = ScanConfig::new()
            .with_adapter_name("hci1")
            .with_target_name("Local")
            .with_scan_timeout(Duration::from_secs(3));

        assert_eq!(config.adapter_name.as_deref(), Some("hci1"));
        assert_eq!(config.target_name.as_deref(), Some("Local"));
        assert_eq!(config.scan_timeout, Duration::from_secs(3));
    }
}
