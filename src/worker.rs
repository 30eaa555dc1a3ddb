use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::converter::convert;
use crate::error::ProcessingOutcome;
use crate::forwarder::EventSink;
use crate::types::{DispatchStats, RawPayload};

#[cfg(feature = "metrics")]
fn metric_inc(name: &'static str) {
    metrics::increment_counter!(name);
}

#[cfg(not(feature = "metrics"))]
fn metric_inc(_name: &'static str) {}

/// A unit of work consumed by the worker.
#[derive(Debug, Clone)]
pub struct Task {
    /// Position in acceptance order, used to correlate log lines.
    pub sequence: u64,
    pub payload: RawPayload,
}

/// Relay counters shared by the dispatcher and the worker.
#[derive(Debug, Default)]
pub struct Counters {
    accepted: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl Counters {
    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
        metric_inc("relay.accepted");
    }

    fn record_outcome(&self, outcome: &ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Delivered => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
                metric_inc("relay.delivery.success");
            }
            ProcessingOutcome::Failed(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                metric_inc("relay.delivery.failure");
            }
            ProcessingOutcome::Dropped(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                metric_inc("relay.schema.dropped");
            }
        }
    }

    pub fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Shared, read-only context for the worker.
pub struct WorkerContext {
    pub sink: Arc<dyn EventSink>,
    pub counters: Arc<Counters>,
}

/// Main worker loop.
///
/// Drains the queue one task at a time until every sender is gone.
/// Failures are logged and counted; none of them stop the loop.
pub async fn worker_loop(mut rx: mpsc::Receiver<Task>, ctx: Arc<WorkerContext>) {
    while let Some(task) = rx.recv().await {
        let outcome = process_task(&task, &ctx).await;
        ctx.counters.record_outcome(&outcome);
    }

    debug!("dispatch queue closed, worker exiting");
}

/// Convert and forward a single payload.
pub async fn process_task(task: &Task, ctx: &WorkerContext) -> ProcessingOutcome {
    let event = match convert(&task.payload) {
        Ok(event) => event,
        Err(err) => {
            warn!(sequence = task.sequence, field = err.field(), error = %err, "dropping payload");
            return ProcessingOutcome::Dropped(err);
        }
    };

    debug!(
        sequence = task.sequence,
        body = %serde_json::to_string(&event).unwrap_or_default(),
        "forwarding event"
    );

    match ctx.sink.forward(&event).await {
        Ok(()) => {
            info!(
                sequence = task.sequence,
                event = %event.event,
                message_id = %event.message_id,
                "event forwarded"
            );
            ProcessingOutcome::Delivered
        }
        Err(reason) => {
            warn!(
                sequence = task.sequence,
                message_id = %event.message_id,
                error = %reason,
                "event delivery failed, dropping"
            );
            ProcessingOutcome::Failed(reason)
        }
    }
}
