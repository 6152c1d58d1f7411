//! Shared engine state, visible to all worker tasks and the probe.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Run flag plus the idle-worker count the termination probe reads.
///
/// `pending_workers` counts workers currently blocked at the queue boundary
/// waiting for the next request; it is incremented when a worker begins
/// waiting and decremented the moment a request is obtained. It is a proxy
/// for "idle at the scheduler", not "doing nothing".
#[derive(Debug, Default)]
pub struct EngineState {
    pub(crate) running: AtomicBool,
    pub(crate) pending_workers: AtomicUsize,
}

impl EngineState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn pending_workers(&self) -> usize {
        self.pending_workers.load(Ordering::SeqCst)
    }
}
