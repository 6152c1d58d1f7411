//! # Statistics Module
//!
//! Collects counters about a crawl for monitoring and the end-of-run report.
//!
//! All counters are atomic so every worker updates them without locking.
//! A snapshot is taken for presentation so the report is internally
//! consistent even while the crawl is still running.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Collects and stores various statistics about the engine's operation.
#[derive(Debug)]
pub struct StatCollector {
    start_time: Instant,

    pub requests_enqueued: AtomicUsize,
    pub requests_dropped: AtomicUsize,
    pub requests_failed: AtomicUsize,
    pub responses_received: AtomicUsize,
    pub parse_errors: AtomicUsize,
    pub item_batches_forwarded: AtomicUsize,
    pub item_batches_dropped: AtomicUsize,

    pub response_status_counts: DashMap<u16, usize>,
}

struct StatsSnapshot {
    requests_enqueued: usize,
    requests_dropped: usize,
    requests_failed: usize,
    responses_received: usize,
    parse_errors: usize,
    item_batches_forwarded: usize,
    item_batches_dropped: usize,
    response_status_counts: HashMap<u16, usize>,
    elapsed: Duration,
}

impl StatCollector {
    pub(crate) fn new() -> Self {
        StatCollector {
            start_time: Instant::now(),
            requests_enqueued: AtomicUsize::new(0),
            requests_dropped: AtomicUsize::new(0),
            requests_failed: AtomicUsize::new(0),
            responses_received: AtomicUsize::new(0),
            parse_errors: AtomicUsize::new(0),
            item_batches_forwarded: AtomicUsize::new(0),
            item_batches_dropped: AtomicUsize::new(0),
            response_status_counts: DashMap::new(),
        }
    }

    fn snapshot(&self) -> StatsSnapshot {
        let mut status_counts = HashMap::new();
        for entry in self.response_status_counts.iter() {
            status_counts.insert(*entry.key(), *entry.value());
        }

        StatsSnapshot {
            requests_enqueued: self.requests_enqueued.load(Ordering::SeqCst),
            requests_dropped: self.requests_dropped.load(Ordering::SeqCst),
            requests_failed: self.requests_failed.load(Ordering::SeqCst),
            responses_received: self.responses_received.load(Ordering::SeqCst),
            parse_errors: self.parse_errors.load(Ordering::SeqCst),
            item_batches_forwarded: self.item_batches_forwarded.load(Ordering::SeqCst),
            item_batches_dropped: self.item_batches_dropped.load(Ordering::SeqCst),
            response_status_counts: status_counts,
            elapsed: self.start_time.elapsed(),
        }
    }

    pub(crate) fn increment_requests_enqueued(&self) {
        self.requests_enqueued.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_requests_dropped(&self) {
        self.requests_dropped.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_requests_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_responses_received(&self) {
        self.responses_received.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_parse_errors(&self) {
        self.parse_errors.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_item_batches_forwarded(&self) {
        self.item_batches_forwarded.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_item_batches_dropped(&self) {
        self.item_batches_dropped.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_response_status(&self, status_code: u16) {
        *self.response_status_counts.entry(status_code).or_insert(0) += 1;
    }
}

impl Default for StatCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StatCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();

        writeln!(f, "\nCrawl Statistics")?;
        writeln!(f, "----------------")?;
        writeln!(f, "  duration : {:?}", snapshot.elapsed)?;
        writeln!(
            f,
            "  requests : enqueued: {}, dropped: {}, failed: {}",
            snapshot.requests_enqueued, snapshot.requests_dropped, snapshot.requests_failed
        )?;
        writeln!(
            f,
            "  response : received: {}, parse errors: {}",
            snapshot.responses_received, snapshot.parse_errors
        )?;
        writeln!(
            f,
            "  items    : forwarded: {}, dropped: {}",
            snapshot.item_batches_forwarded, snapshot.item_batches_dropped
        )?;

        let status_string = if snapshot.response_status_counts.is_empty() {
            "none".to_string()
        } else {
            snapshot
                .response_status_counts
                .iter()
                .map(|(code, count)| format!("{}: {}", code, count))
                .collect::<Vec<String>>()
                .join(", ")
        };

        writeln!(f, "  status   : {}", status_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = StatCollector::new();
        stats.increment_requests_enqueued();
        stats.increment_requests_enqueued();
        stats.record_response_status(200);
        stats.record_response_status(200);
        stats.record_response_status(404);

        assert_eq!(stats.requests_enqueued.load(Ordering::SeqCst), 2);
        assert_eq!(*stats.response_status_counts.get(&200).unwrap(), 2);
        assert_eq!(*stats.response_status_counts.get(&404).unwrap(), 1);
    }
}
