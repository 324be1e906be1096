//! In-flight connection bookkeeping

use tokio::task::JoinHandle;

use crate::session::SessionOutcome;

// ----------------------------------------------------------------------------
// Connection Records
// ----------------------------------------------------------------------------

/// One in-flight device connection: the record lives from the moment its
/// worker is spawned until the controller joins the worker during drain.
#[derive(Debug)]
pub struct ConnectionRecord {
    /// Target device address (text form)
    pub address: String,
    /// Advertised name that matched the filter
    pub device_name: String,
    /// Join handle of the connection worker
    pub(crate) worker: JoinHandle<SessionOutcome>,
}

impl ConnectionRecord {
    pub(crate) fn new(
        address: String,
        device_name: String,
        worker: JoinHandle<SessionOutcome>,
    ) -> Self {
        Self {
            address,
            device_name,
            worker,
        }
    }
}

// ----------------------------------------------------------------------------
// Connection Registry
// ----------------------------------------------------------------------------

/// Registry of in-flight connections, owned solely by the scan controller.
///
/// Insertion happens while the controller processes discovery events and
/// draining happens strictly after the scan window ends, so no lock is
/// needed. Records drain in reverse insertion order (head-insertion list);
/// callers must not rely on drain order.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    records: Vec<ConnectionRecord>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the head of the registry
    pub(crate) fn register(&mut self, record: ConnectionRecord) {
        self.records.push(record);
    }

    /// Remove and return the most recently inserted record
    pub(crate) fn pop(&mut self) -> Option<ConnectionRecord> {
        self.records.pop()
    }

    /// Number of in-flight connections
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any connection is still in flight
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
