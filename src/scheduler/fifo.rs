//! FIFO scheduler backed by a bounded MPMC channel.

use kanal::{bounded_async, AsyncReceiver, AsyncSender};
use parking_lot::Mutex;
use tracing::trace;

use crate::request::Request;
use crate::scheduler::{Popped, Scheduler};
use async_trait::async_trait;

const DEFAULT_CAPACITY: usize = 100;

/// Pops requests in admission order.
///
/// Pushes park when the queue is at capacity and fail once the scheduler is
/// stopped. Pops block until a request is available or the queue is both
/// closed and drained, so this variant never reports [`Popped::Empty`].
pub struct FifoScheduler {
    tx: Mutex<Option<AsyncSender<Request>>>,
    rx: AsyncReceiver<Request>,
}

impl FifoScheduler {
    /// Creates a scheduler with the default capacity of 100.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a scheduler holding at most `capacity` queued requests.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = bounded_async(capacity);
        FifoScheduler {
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }
}

impl Default for FifoScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scheduler for FifoScheduler {
    fn start(&self) {}

    fn stop(&self) {
        // Dropping the only sender closes intake; receivers still drain
        // whatever is queued before observing closure.
        if self.tx.lock().take().is_some() {
            trace!("fifo scheduler stopped");
        }
    }

    async fn push_request(&self, req: Request) -> bool {
        // Clone the sender out so the lock is not held across the send.
        let tx = match self.tx.lock().as_ref() {
            Some(tx) => tx.clone(),
            None => return false,
        };
        tx.send(req).await.is_ok()
    }

    async fn pop_request(&self) -> Popped {
        match self.rx.recv().await {
            Ok(req) => Popped::Request(req),
            Err(_) => Popped::Closed,
        }
    }

    fn has_more(&self) -> bool {
        self.rx.len() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> Request {
        Request::new(url)
    }

    #[tokio::test]
    async fn pops_in_admission_order() {
        let sched = FifoScheduler::new();
        for url in ["http://a", "http://b", "http://c"] {
            assert!(sched.push_request(request(url)).await);
        }

        for expected in ["http://a", "http://b", "http://c"] {
            match sched.pop_request().await {
                Popped::Request(req) => assert_eq!(req.url, expected),
                other => panic!("expected request, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn has_more_tracks_queue_occupancy() {
        let sched = FifoScheduler::new();
        assert!(!sched.has_more());
        assert!(sched.push_request(request("http://a")).await);
        assert!(sched.has_more());
        let _ = sched.pop_request().await;
        assert!(!sched.has_more());
    }

    #[tokio::test]
    async fn stop_rejects_new_pushes_but_keeps_queued_entries() {
        let sched = FifoScheduler::new();
        assert!(sched.push_request(request("http://a")).await);
        sched.stop();
        sched.stop(); // no-op
        assert!(!sched.push_request(request("http://b")).await);

        match sched.pop_request().await {
            Popped::Request(req) => assert_eq!(req.url, "http://a"),
            other => panic!("expected queued request to survive stop, got {:?}", other),
        }
        assert!(matches!(sched.pop_request().await, Popped::Closed));
    }

    #[tokio::test]
    async fn pop_blocks_until_push() {
        let sched = std::sync::Arc::new(FifoScheduler::new());
        let popper = {
            let sched = sched.clone();
            tokio::spawn(async move { sched.pop_request().await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(sched.push_request(request("http://late")).await);

        match popper.await.unwrap() {
            Popped::Request(req) => assert_eq!(req.url, "http://late"),
            other => panic!("expected request, got {:?}", other),
        }
    }
}
