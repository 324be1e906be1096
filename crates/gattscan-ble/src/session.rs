//! GATT session: connect, enumerate, print, disconnect
//!
//! One session runs per accepted device, on its own task. The worker that
//! spawned it waits on a one-shot channel; the session is the only signaler
//! and it signals exactly once, on every path.

use btleplug::api::{CharPropFlags, Peripheral as _};
use btleplug::platform::Peripheral;
use tokio::sync::oneshot;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::{Result, ScanError};

// ----------------------------------------------------------------------------
// Session Outcome
// ----------------------------------------------------------------------------

/// What one device session accomplished, reported back to the worker through
/// its completion channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Whether the connect attempt succeeded
    pub connected: bool,
    /// Number of services enumerated
    pub services: usize,
    /// Number of characteristics enumerated
    pub characteristics: usize,
}

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Resolve one device's connect attempt: connect, enumerate the GATT table,
/// disconnect, then signal completion.
///
/// Failures are logged and degrade the session, never abort it. A failed
/// connect skips discovery and a failed discovery still disconnects; every
/// path reaches the completion signal.
pub(crate) async fn connect_and_enumerate(
    peripheral: Peripheral,
    address: String,
    done: oneshot::Sender<SessionOutcome>,
) {
    let mut outcome = SessionOutcome::default();

    match connect(&peripheral, &address).await {
        Ok(()) => {
            outcome.connected = true;
            match enumerate(&peripheral, &address).await {
                Ok((services, characteristics)) => {
                    outcome.services = services;
                    outcome.characteristics = characteristics;
                }
                Err(err) => error!("{err}"),
            }
            if let Err(err) = disconnect(&peripheral, &address).await {
                error!("{err}");
            }
        }
        // A failed connect still signals completion below; the worker on the
        // other end of the channel has no other wakeup.
        Err(err) => error!("{err}"),
    }

    if done.send(outcome).is_err() {
        warn!("Connection worker for '{address}' went away before completion");
    }
}

async fn connect(peripheral: &Peripheral, address: &str) -> Result<()> {
    peripheral
        .connect()
        .await
        .map_err(|e| ScanError::ConnectFailed {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Discover the GATT table and print it: one pass over the services, then
/// one pass over all characteristics.
async fn enumerate(peripheral: &Peripheral, address: &str) -> Result<(usize, usize)> {
    peripheral
        .discover_services()
        .await
        .map_err(|e| ScanError::ServiceDiscovery {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

    let services = peripheral.services();
    for (index, service) in services.iter().enumerate() {
        println!("{}", format_service(index, service.primary, service.uuid));
    }

    let characteristics = peripheral.characteristics();
    for (index, characteristic) in characteristics.iter().enumerate() {
        println!(
            "{}",
            format_characteristic(index, characteristic.properties, characteristic.uuid)
        );
    }

    Ok((services.len(), characteristics.len()))
}

async fn disconnect(peripheral: &Peripheral, address: &str) -> Result<()> {
    peripheral
        .disconnect()
        .await
        .map_err(|e| ScanError::Disconnect {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

fn format_service(index: usize, primary: bool, uuid: Uuid) -> String {
    format!("service[{index}] primary:{primary} uuid:{uuid}")
}

fn format_characteristic(index: usize, properties: CharPropFlags, uuid: Uuid) -> String {
    format!(
        "characteristic[{index}] properties:{:#04x} uuid:{uuid}",
        properties.bits()
    )
}
