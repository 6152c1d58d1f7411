//! Termination detection.
//!
//! "No requests in flight right now" is not the same as "no more requests
//! will ever be produced": a worker may be inside a parse step that is about
//! to enqueue new work. The probe therefore requires two observations,
//! separated by a debounce interval, of the quiescence condition before it
//! stops the engine: the scheduler reports nothing pending AND every worker
//! is blocked waiting at the queue boundary.

use std::sync::Arc;

use tracing::info;

use super::EngineInner;

pub(crate) async fn run_probe(inner: Arc<EngineInner>) {
    loop {
        if !inner.state.is_running() {
            // Stopped externally; nothing left to watch.
            return;
        }

        if quiescent(&inner) {
            tokio::time::sleep(inner.config.probe_debounce).await;
            if quiescent(&inner) {
                info!("no more pending requests, stopping engine");
                inner.stop();
                return;
            }
        }

        tokio::time::sleep(inner.config.probe_interval).await;
    }
}

fn quiescent(inner: &EngineInner) -> bool {
    !inner.scheduler.has_more() && inner.state.pending_workers() == inner.config.concurrency
}
