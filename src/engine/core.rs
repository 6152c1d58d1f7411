//! The central `Engine` implementation.
//!
//! Ties together the scheduler, downloader, middlewares, spiders and item
//! pipelines to execute a crawl. The engine spawns a fixed pool of worker
//! tasks that drain the scheduler plus one termination probe, then joins
//! them all once the scheduler is closed.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::builder::EngineConfig;
use crate::downloader::Downloader;
use crate::middleware::{RequestMiddleware, ResponseMiddleware};
use crate::pipeline::Pipeline;
use crate::scheduler::Scheduler;
use crate::spider::Spider;
use crate::state::EngineState;
use crate::stats::StatCollector;

use super::probe::run_probe;
use super::worker::run_worker;

pub(crate) struct EngineInner {
    pub(crate) scheduler: Arc<dyn Scheduler>,
    pub(crate) downloader: Arc<dyn Downloader>,
    pub(crate) spiders: RwLock<Vec<Arc<dyn Spider>>>,
    pub(crate) pipelines: RwLock<HashMap<String, Vec<Arc<dyn Pipeline>>>>,
    pub(crate) request_middlewares: Vec<Arc<dyn RequestMiddleware>>,
    pub(crate) response_middlewares: Vec<Arc<dyn ResponseMiddleware>>,
    pub(crate) config: EngineConfig,
    pub(crate) state: EngineState,
    pub(crate) stats: Arc<StatCollector>,
}

impl EngineInner {
    /// Spiders whose URL matcher matches `url`, in registration order.
    pub(crate) fn matching_spiders(&self, url: &str) -> Vec<Arc<dyn Spider>> {
        self.spiders
            .read()
            .iter()
            .filter(|spider| spider.url_matcher().matches(url))
            .cloned()
            .collect()
    }

    /// Stops the engine: flips the run flag and closes the scheduler, after
    /// which every worker observes exhaustion and exits. Idempotent.
    pub(crate) fn stop(&self) {
        if !self.state.running.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("stopping engine");
        self.scheduler.stop();
    }
}

/// The crawling engine.
///
/// Construct one through [`EngineBuilder`](crate::EngineBuilder), register
/// spiders and pipelines, then call [`run`](Engine::run).
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    pub(crate) fn from_parts(
        scheduler: Arc<dyn Scheduler>,
        downloader: Arc<dyn Downloader>,
        request_middlewares: Vec<Arc<dyn RequestMiddleware>>,
        response_middlewares: Vec<Arc<dyn ResponseMiddleware>>,
        config: EngineConfig,
    ) -> Self {
        Engine {
            inner: Arc::new(EngineInner {
                scheduler,
                downloader,
                spiders: RwLock::new(Vec::new()),
                pipelines: RwLock::new(HashMap::new()),
                request_middlewares,
                response_middlewares,
                config,
                state: EngineState::new(),
                stats: Arc::new(StatCollector::new()),
            }),
        }
    }

    /// Registers a spider. Usually done before [`run`](Engine::run); the
    /// registry tolerates concurrent registration afterwards.
    pub fn register_spider(&self, spider: impl Spider + 'static) {
        info!(spider = spider.name(), "loading spider");
        self.inner.spiders.write().push(Arc::new(spider));
    }

    /// Registers a pipeline under every distinct name in its interest list.
    pub fn register_pipeline(&self, pipeline: impl Pipeline + 'static) {
        let pipeline: Arc<dyn Pipeline> = Arc::new(pipeline);
        let mut map = self.inner.pipelines.write();
        let mut seen = HashSet::new();
        for name in pipeline.item_list() {
            // A pipeline listing the same name twice still gets one delivery.
            if !seen.insert(name.clone()) {
                continue;
            }
            map.entry(name).or_default().push(Arc::clone(&pipeline));
        }
    }

    /// The statistics collected so far.
    pub fn stats(&self) -> Arc<StatCollector> {
        Arc::clone(&self.inner.stats)
    }

    /// Stops a running crawl. Cooperative: in-flight downloads finish their
    /// current iteration before the workers exit.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Runs the crawl to completion.
    ///
    /// Loads every spider's seed requests, spawns the worker pool and the
    /// termination probe, and returns once all workers have exited, either
    /// because the probe detected quiescence or because [`stop`](Engine::stop)
    /// was called. Calling `run` while already running is a logged no-op.
    pub async fn run(&self) {
        if self.inner.state.running.swap(true, Ordering::SeqCst) {
            info!("engine already running");
            return;
        }

        info!(concurrency = self.inner.config.concurrency, "starting engine");
        self.inner.scheduler.start();

        self.load_start_requests().await;

        let mut workers = JoinSet::new();
        for worker_id in 0..self.inner.config.concurrency {
            workers.spawn(run_worker(Arc::clone(&self.inner), worker_id));
        }
        let probe = tokio::spawn(run_probe(Arc::clone(&self.inner)));

        while let Some(res) = workers.join_next().await {
            if let Err(err) = res {
                if err.is_panic() {
                    error!(error = %err, "worker panicked");
                }
            }
        }

        // Workers only exit once the scheduler is closed; make sure the run
        // flag agrees so the probe task winds down.
        self.inner.stop();
        if let Err(err) = probe.await {
            error!(error = %err, "termination probe failed");
        }

        info!("crawl finished{}", self.inner.stats);
    }

    /// Loads each spider's seed requests into the scheduler at depth 1.
    async fn load_start_requests(&self) {
        let spiders: Vec<Arc<dyn Spider>> = self.inner.spiders.read().clone();
        for spider in spiders {
            for mut req in spider.start_requests() {
                req.set_depth(1);
                info!(spider = spider.name(), url = %req.url, "adding start request");
                if !self.inner.scheduler.push_request(req).await {
                    warn!("scheduler rejected start request, abandoning remaining seeds");
                    return;
                }
                self.inner.stats.increment_requests_enqueued();
            }
        }
    }
}
