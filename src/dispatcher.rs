use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::DispatchError;
use crate::forwarder::EventSink;
use crate::types::{DispatchStats, RawPayload};
use crate::worker::{worker_loop, Counters, Task, WorkerContext};

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Payloads that may wait for the worker before `submit` blocks.
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1_024,
        }
    }
}

/// Bounded hand-off between request handling and the single worker.
///
/// Accepted payloads are converted and forwarded strictly in the order
/// they entered the queue. Acceptance says nothing about delivery: once
/// `submit` returns, every later failure is logged and counted but never
/// reported back to the submitter.
pub struct Dispatcher {
    tx: Mutex<Option<mpsc::Sender<Task>>>,
    is_running: AtomicBool,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
    next_sequence: AtomicU64,
}

impl Dispatcher {
    /// Must be called from within a tokio runtime.
    pub fn new(config: DispatcherConfig, sink: Arc<dyn EventSink>) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let counters = Arc::new(Counters::default());

        let ctx = Arc::new(WorkerContext {
            sink,
            counters: counters.clone(),
        });
        let worker_handle = tokio::spawn(worker_loop(rx, ctx));

        Self {
            tx: Mutex::new(Some(tx)),
            is_running: AtomicBool::new(true),
            worker_handle: Mutex::new(Some(worker_handle)),
            counters,
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Queue a payload for conversion and forwarding.
    ///
    /// Waits while the queue is full; nothing is dropped to make room.
    pub async fn submit(&self, payload: RawPayload) -> Result<(), DispatchError> {
        if !self.is_running.load(Ordering::SeqCst) {
            return Err(DispatchError::Shutdown);
        }

        let tx = {
            let guard = self.tx.lock().await;
            guard.clone().ok_or(DispatchError::Shutdown)?
        };

        let permit = tx.reserve().await.map_err(|_| DispatchError::Shutdown)?;

        // Counted before the worker can see it; nothing awaits after this.
        self.counters.record_accepted();
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        permit.send(Task { sequence, payload });

        debug!(sequence, "payload queued");
        Ok(())
    }

    /// Stop accepting payloads and wait for the queue to drain.
    ///
    /// Submissions already waiting for capacity still complete. Calling
    /// this more than once is harmless.
    pub async fn shutdown(&self) {
        self.is_running.store(false, Ordering::SeqCst);
        self.tx.lock().await.take();

        let handle = self.worker_handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
            info!(stats = ?self.stats(), "dispatcher drained");
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }
}
