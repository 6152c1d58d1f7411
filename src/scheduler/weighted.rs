//! Weight-ordered scheduler.
//!
//! Producers admit requests through an unbounded channel; a single merge
//! task owns all heap insertions, so the hot admission path never contends
//! on the heap mutex. Consumers extract the current maximum weight under the
//! mutex. Equal weights pop in unspecified order.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use kanal::{unbounded_async, AsyncReceiver, AsyncSender};
use parking_lot::Mutex;
use tracing::trace;

use crate::request::Request;
use crate::scheduler::{Popped, Scheduler};
use async_trait::async_trait;

struct Entry {
    weight: i32,
    req: Request,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Weight only. Ties keep whatever order the heap happens to hold.
        self.weight.cmp(&other.weight)
    }
}

/// Pops the highest-weight pending request first.
pub struct WeightedScheduler {
    tx: Mutex<Option<AsyncSender<Request>>>,
    rx: AsyncReceiver<Request>,
    heap: Arc<Mutex<BinaryHeap<Entry>>>,
    /// Entries admitted but not yet popped, counting both the channel and
    /// the heap. Backs `has_more` and the exhaustion check.
    queued: Arc<AtomicUsize>,
    /// Set by the merge task once the admission channel is closed and fully
    /// merged into the heap.
    drained: Arc<AtomicBool>,
    started: AtomicBool,
}

impl WeightedScheduler {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_async();
        WeightedScheduler {
            tx: Mutex::new(Some(tx)),
            rx,
            heap: Arc::new(Mutex::new(BinaryHeap::new())),
            queued: Arc::new(AtomicUsize::new(0)),
            drained: Arc::new(AtomicBool::new(false)),
            started: AtomicBool::new(false),
        }
    }
}

impl Default for WeightedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scheduler for WeightedScheduler {
    fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let rx = self.rx.clone();
        let heap = Arc::clone(&self.heap);
        let drained = Arc::clone(&self.drained);
        tokio::spawn(async move {
            trace!("weighted scheduler merge loop started");
            while let Ok(req) = rx.recv().await {
                heap.lock().push(Entry {
                    weight: req.weight,
                    req,
                });
            }
            drained.store(true, Ordering::SeqCst);
            trace!("weighted scheduler merge loop finished");
        });
    }

    fn stop(&self) {
        // Dropping the only sender ends the merge loop once it has absorbed
        // every in-flight admission; queued entries stay poppable.
        if self.tx.lock().take().is_some() {
            trace!("weighted scheduler stopped");
        }
    }

    async fn push_request(&self, req: Request) -> bool {
        let tx = match self.tx.lock().as_ref() {
            Some(tx) => tx.clone(),
            None => return false,
        };

        self.queued.fetch_add(1, Ordering::SeqCst);
        if tx.send(req).await.is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        true
    }

    async fn pop_request(&self) -> Popped {
        let entry = self.heap.lock().pop();
        if let Some(entry) = entry {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return Popped::Request(entry.req);
        }

        if self.drained.load(Ordering::SeqCst) && self.queued.load(Ordering::SeqCst) == 0 {
            Popped::Closed
        } else {
            // Either truly idle or an admission is still on its way into
            // the heap; the caller retries.
            Popped::Empty
        }
    }

    fn has_more(&self) -> bool {
        self.queued.load(Ordering::SeqCst) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Retries transient emptiness so tests don't race the merge task.
    async fn pop_settled(sched: &WeightedScheduler) -> Popped {
        for _ in 0..100 {
            match sched.pop_request().await {
                Popped::Empty => tokio::time::sleep(Duration::from_millis(5)).await,
                other => return other,
            }
        }
        Popped::Empty
    }

    #[tokio::test]
    async fn highest_weight_pops_first() {
        let sched = WeightedScheduler::new();
        sched.start();
        sched.start(); // idempotent

        for (url, weight) in [("http://a", 1), ("http://b", 5), ("http://c", 1)] {
            assert!(sched.push_request(Request::new(url).with_weight(weight)).await);
        }

        // Give the merge task time to absorb all three admissions so the
        // first pop sees the full heap.
        tokio::time::sleep(Duration::from_millis(50)).await;

        match pop_settled(&sched).await {
            Popped::Request(req) => assert_eq!(req.url, "http://b"),
            other => panic!("expected b first, got {:?}", other),
        }

        // A and C come out in some order, never before B.
        let mut rest = Vec::new();
        for _ in 0..2 {
            match pop_settled(&sched).await {
                Popped::Request(req) => rest.push(req.url),
                other => panic!("expected request, got {:?}", other),
            }
        }
        rest.sort();
        assert_eq!(rest, ["http://a", "http://c"]);
    }

    #[tokio::test]
    async fn empty_but_open_reports_retry() {
        let sched = WeightedScheduler::new();
        sched.start();
        assert!(matches!(sched.pop_request().await, Popped::Empty));
    }

    #[tokio::test]
    async fn stop_then_drain_reports_closed() {
        let sched = WeightedScheduler::new();
        sched.start();
        assert!(sched.push_request(Request::new("http://a").with_weight(2)).await);
        sched.stop();
        assert!(!sched.push_request(Request::new("http://b")).await);

        match pop_settled(&sched).await {
            Popped::Request(req) => assert_eq!(req.url, "http://a"),
            other => panic!("expected queued request to survive stop, got {:?}", other),
        }
        match pop_settled(&sched).await {
            Popped::Closed => {}
            other => panic!("expected closed after drain, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn has_more_true_right_after_push() {
        let sched = WeightedScheduler::new();
        sched.start();
        assert!(!sched.has_more());
        assert!(sched.push_request(Request::new("http://a")).await);
        assert!(sched.has_more());
    }
}
