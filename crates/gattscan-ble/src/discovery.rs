//! Device discovery and scan orchestration
//!
//! The scan controller owns the whole run: it opens the named (or default)
//! adapter, holds the session gate across a fixed-length discovery scan,
//! spawns one connection worker per accepted advertisement, and drains the
//! connection registry once the scan window closes.

use std::sync::Arc;

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, PeripheralId};
use futures::stream::StreamExt;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::registry::{ConnectionRecord, ConnectionRegistry};
use crate::worker::{self, SessionGate, WorkerContext};

// ----------------------------------------------------------------------------
// Scan Summary
// ----------------------------------------------------------------------------

/// Counters for one scan run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Advertisements seen during the scan window
    pub discovered: usize,
    /// Advertisements whose name matched the filter
    pub matched: usize,
    /// Workers joined during drain
    pub sessions: usize,
}

// ----------------------------------------------------------------------------
// Scan Controller
// ----------------------------------------------------------------------------

/// Orchestrates one scan-and-enumerate run
pub struct ScanController {
    config: ScanConfig,
}

impl ScanController {
    /// Create a controller for the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Run to completion: open the adapter, scan for the configured window,
    /// then wait for every spawned worker before returning.
    ///
    /// Adapter-open and scan-start failures are fatal for the run; any
    /// failure while handling a single device only skips that device.
    pub async fn run(&self) -> Result<ScanSummary> {
        let adapter = self.open_adapter().await?;

        let gate: SessionGate = Arc::new(Mutex::new(()));
        let mut registry = ConnectionRegistry::new();
        let mut summary = ScanSummary::default();

        self.scan(&adapter, &gate, &mut registry, &mut summary)
            .await?;

        // Drain: wait for every worker spawned during the scan window,
        // most recently registered first.
        while let Some(record) = registry.pop() {
            match record.worker.await {
                Ok(outcome) => {
                    summary.sessions += 1;
                    debug!(
                        "Worker for '{}' ({}) done: connected={} services={} characteristics={}",
                        record.device_name,
                        record.address,
                        outcome.connected,
                        outcome.services,
                        outcome.characteristics
                    );
                }
                Err(e) => error!(
                    "Connection worker for '{}' did not run to completion: {e}",
                    record.address
                ),
            }
        }

        Ok(summary)
    }

    /// Open the configured adapter, or the system default when none is named
    async fn open_adapter(&self) -> Result<Adapter> {
        let manager = Manager::new()
            .await
            .map_err(|e| ScanError::AdapterOpen(e.to_string()))?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|e| ScanError::AdapterOpen(e.to_string()))?;

        let adapter = match &self.config.adapter_name {
            Some(name) => {
                let mut selected = None;
                for adapter in adapters {
                    match adapter.adapter_info().await {
                        Ok(info) if info.contains(name.as_str()) => {
                            selected = Some(adapter);
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => debug!("Skipping adapter with unreadable info: {e}"),
                    }
                }
                selected.ok_or_else(|| ScanError::AdapterNotFound { name: name.clone() })?
            }
            None => adapters.into_iter().next().ok_or(ScanError::NoAdapter)?,
        };

        match adapter.adapter_info().await {
            Ok(info) => info!("Opened adapter {info}"),
            Err(_) => info!("Opened adapter"),
        }
        Ok(adapter)
    }

    /// Run the fixed-length discovery scan, spawning a worker per accepted
    /// advertisement. Holds the session gate for the whole window so no
    /// worker starts its GATT session while discovery is still running.
    async fn scan(
        &self,
        adapter: &Adapter,
        gate: &SessionGate,
        registry: &mut ConnectionRegistry,
        summary: &mut ScanSummary,
    ) -> Result<()> {
        let _scan_hold = gate.lock().await;

        let mut events = adapter
            .events()
            .await
            .map_err(|e| ScanError::ScanFailed(e.to_string()))?;
        adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(|e| ScanError::ScanFailed(e.to_string()))?;
        info!("Scanning for {:?}", self.config.scan_timeout);

        let deadline = sleep(self.config.scan_timeout);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.next() => match event {
                    Some(CentralEvent::DeviceDiscovered(id)) => {
                        self.handle_discovered(adapter, &id, gate, registry, summary)
                            .await;
                    }
                    Some(_) => {}
                    None => {
                        warn!("Adapter event stream ended before the scan window closed");
                        break;
                    }
                },
            }
        }

        if let Err(e) = adapter.stop_scan().await {
            warn!("Failed to stop scan: {e}");
        }
        println!("Scan completed");
        Ok(())
    }

    /// Handle one discovered advertisement: print it, apply the name filter,
    /// and spawn a connection worker on a match. Failures here skip the
    /// device, never the run.
    async fn handle_discovered(
        &self,
        adapter: &Adapter,
        id: &PeripheralId,
        gate: &SessionGate,
        registry: &mut ConnectionRegistry,
        summary: &mut ScanSummary,
    ) {
        let peripheral = match adapter.peripheral(id).await {
            Ok(peripheral) => peripheral,
            Err(e) => {
                error!("Failed to look up discovered peripheral: {e}");
                return;
            }
        };
        let properties = match peripheral.properties().await {
            Ok(Some(properties)) => properties,
            Ok(None) => {
                debug!("No advertisement data for {id}");
                return;
            }
            Err(e) => {
                error!("Failed to read advertisement for {id}: {e}");
                return;
            }
        };

        summary.discovered += 1;
        let address = properties.address.to_string();
        let name = properties.local_name.as_deref();
        match name {
            Some(name) => println!("Discovered {address} - '{name}'"),
            None => println!("Discovered {address}"),
        }

        if !accepts(self.config.target_name.as_deref(), name) {
            return;
        }
        summary.matched += 1;

        let device_name = name.unwrap_or_default().to_string();
        let worker = tokio::spawn(worker::run(WorkerContext {
            peripheral,
            address: address.clone(),
            gate: Arc::clone(gate),
        }));
        registry.register(ConnectionRecord::new(address, device_name, worker));
    }
}

/// Name filter: exact match against the configured target. An advertisement
/// without a name never matches, and an unset target accepts nothing.
fn accepts(target: Option<&str>, advertised: Option<&str>) -> bool {
    match (target, advertised) {
        (Some(target), Some(name)) => target == name,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nameless_advertisements_never_match() {
        assert!(!accepts(Some("Local"), None));
        assert!(!accepts(None, None));
    }

    #[test]
    fn mismatched_names_are_ignored() {
        assert!(!accepts(Some("Local"), Some("Remote")));
        assert!(!accepts(Some("Local"), Some("local")));
        assert!(!accepts(Some("Local"), Some("Local ")));
    }

    #[test]
    fn unset_target_accepts_nothing() {
        assert!(!accepts(None, Some("Local")));
    }

    #[test]
    fn exact_match_is_accepted() {
        assert!(accepts(Some("Local"), Some("Local")));
    }

    #[test]
    fn summary_starts_empty() {
        let summary = ScanSummary::default();
        assert_eq!(summary.discovered, 0);
        assert_eq!(summary.matched, 0);
        assert_eq!(summary.sessions, 0);
    }
}
