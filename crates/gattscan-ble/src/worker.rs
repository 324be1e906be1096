//! Per-device connection worker

use std::sync::Arc;

use btleplug::platform::Peripheral;
use tokio::sync::{oneshot, Mutex};
use tracing::error;

use crate::session::{self, SessionOutcome};

// ----------------------------------------------------------------------------
// Session Gate
// ----------------------------------------------------------------------------

/// Global serialization lock. At most one device's connect/discover/disconnect
/// sequence runs at a time, no matter how many workers exist concurrently;
/// the scan controller also holds the gate for the whole scan window so no
/// session starts before discovery ends.
pub(crate) type SessionGate = Arc<Mutex<()>>;

/// Everything a worker needs to run one device's session
pub(crate) struct WorkerContext {
    pub peripheral: Peripheral,
    pub address: String,
    pub gate: SessionGate,
}

// ----------------------------------------------------------------------------
// Worker
// ----------------------------------------------------------------------------

/// Run one accepted device to completion.
///
/// The worker serializes itself against all other workers via the session
/// gate, then hands the connect attempt to the session task and blocks until
/// the session signals completion through its one-shot channel.
pub(crate) async fn run(ctx: WorkerContext) -> SessionOutcome {
    let WorkerContext {
        peripheral,
        address,
        gate,
    } = ctx;

    let _session_slot = gate.lock().await;
    println!("------------START {address} ---------------");

    let (done_tx, done_rx) = oneshot::channel();
    tokio::spawn(session::connect_and_enumerate(
        peripheral,
        address.clone(),
        done_tx,
    ));
    let outcome = wait_for_completion(done_rx, &address).await;

    println!("------------DONE {address} ---------------");
    outcome
}

/// Wait for the session's completion signal.
///
/// The session signals on every path, including a failed connect; the sender
/// only drops unsignaled if the session task itself dies.
async fn wait_for_completion(
    done: oneshot::Receiver<SessionOutcome>,
    address: &str,
) -> SessionOutcome {
    match done.await {
        Ok(outcome) => outcome,
        Err(_) => {
            error!("Session for '{address}' ended without signaling completion");
            SessionOutcome::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn completion_signal_is_delivered() {
        let (done_tx, done_rx) = oneshot::channel();
        let expected = SessionOutcome {
            connected: true,
            services: 2,
            characteristics: 5,
        };
        let sent = expected.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            done_tx.send(sent).unwrap();
        });

        let outcome = wait_for_completion(done_rx, "AA:00:00:00:00:01").await;
        assert_eq!(outcome, expected);
    }

    #[tokio::test]
    async fn dropped_session_does_not_hang_the_worker() {
        let (done_tx, done_rx) = oneshot::channel::<SessionOutcome>();
        drop(done_tx);

        let outcome = wait_for_completion(done_rx, "AA:00:00:00:00:01").await;
        assert_eq!(outcome, SessionOutcome::default());
    }

    #[tokio::test]
    async fn sessions_never_overlap() {
        let gate: SessionGate = Arc::new(Mutex::new(()));
        let inside = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::new();
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            let inside = Arc::clone(&inside);
            let overlaps = Arc::clone(&overlaps);
            workers.push(tokio::spawn(async move {
                let _session_slot = gate.lock().await;
                if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for worker in workers {
            worker.await.unwrap();
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn workers_wait_for_the_scan_window_hold() {
        let gate: SessionGate = Arc::new(Mutex::new(()));
        let started = Arc::new(AtomicUsize::new(0));

        let scan_hold = gate.lock().await;

        let worker = {
            let gate = Arc::clone(&gate);
            let started = Arc::clone(&started);
            tokio::spawn(async move {
                let _session_slot = gate.lock().await;
                started.fetch_add(1, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(started.load(Ordering::SeqCst), 0);

        drop(scan_hold);
        worker.await.unwrap();
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
