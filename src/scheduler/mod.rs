//! # Scheduler Module
//!
//! Holds the pending-request frontier the worker pool drains.
//!
//! Two implementations share one contract: [`FifoScheduler`] pops requests
//! in admission order, [`WeightedScheduler`] pops the highest-weight request
//! first. Both are safe for many concurrent producers and consumers, and
//! both distinguish "empty right now" from "will never have more", which is
//! the distinction the termination protocol depends on.

mod fifo;
mod weighted;

pub use fifo::FifoScheduler;
pub use weighted::WeightedScheduler;

use async_trait::async_trait;

use crate::request::Request;

/// Result of a [`Scheduler::pop_request`] call.
#[derive(Debug)]
pub enum Popped {
    /// The next request to dispatch.
    Request(Request),
    /// The queue is transiently empty; retry, more work may still arrive.
    Empty,
    /// The scheduler has been stopped and drained; no request will ever
    /// come. Workers exit on this.
    Closed,
}

/// Thread-safe holder of pending requests, polymorphic over ordering policy.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Idempotent initialization. The weighted variant uses this to spawn
    /// the task that merges admissions into its heap.
    fn start(&self);

    /// Closes intake. Entries already queued are not lost and remain
    /// poppable; calling twice is a no-op.
    fn stop(&self);

    /// Admits a request. Returns false once the scheduler has been stopped,
    /// signalling the caller to abandon the rest of its batch.
    async fn push_request(&self, req: Request) -> bool;

    /// Removes and returns the next entry according to the ordering policy.
    async fn pop_request(&self) -> Popped;

    /// Best-effort, non-blocking "anything pending?" check (`count > 0`).
    /// Used by the termination probe; racy by design.
    fn has_more(&self) -> bool;
}
