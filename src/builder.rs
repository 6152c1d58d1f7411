//! # Builder Module
//!
//! Provides the `EngineBuilder`, a fluent API for constructing and
//! configuring [`Engine`] instances.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawlkit::{EngineBuilder, FifoScheduler};
//!
//! let engine = EngineBuilder::new()
//!     .downloader(MyDownloader::new())
//!     .concurrency(4)
//!     .max_depth(3)
//!     .throttle(std::time::Duration::from_millis(200))
//!     .build()?;
//!
//! engine.register_spider(MySpider::new());
//! engine.register_pipeline(MyPipeline::new());
//! engine.run().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::downloader::Downloader;
use crate::engine::Engine;
use crate::error::Error;
use crate::middleware::{RequestMiddleware, ResponseMiddleware};
use crate::scheduler::{FifoScheduler, Scheduler};

/// Tunable engine parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of concurrent worker tasks.
    pub concurrency: usize,
    /// Maximum crawl depth; 0 means unlimited.
    pub max_depth: usize,
    /// Fixed delay each worker sleeps between iterations. Process-wide, not
    /// per-host.
    pub throttle: Duration,
    /// How often the termination probe checks for quiescence.
    pub probe_interval: Duration,
    /// How long the probe waits before re-checking a quiescent observation.
    pub probe_debounce: Duration,
    /// Backoff a worker applies when the scheduler is transiently empty.
    pub pop_retry_interval: Duration,
    /// How many times a failed download is retried; 0 disables retries.
    pub download_retries: u32,
    /// Base delay for download retries; doubles on every attempt.
    pub retry_backoff: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            concurrency: 1,
            max_depth: 0,
            throttle: Duration::ZERO,
            probe_interval: Duration::from_secs(1),
            probe_debounce: Duration::from_millis(500),
            pop_retry_interval: Duration::from_millis(50),
            download_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Assembles an [`Engine`] from a scheduler, a downloader, middlewares and
/// configuration. The scheduler defaults to a [`FifoScheduler`]; the
/// downloader has no default and must be supplied.
pub struct EngineBuilder {
    config: EngineConfig,
    scheduler: Arc<dyn Scheduler>,
    downloader: Option<Arc<dyn Downloader>>,
    request_middlewares: Vec<Arc<dyn RequestMiddleware>>,
    response_middlewares: Vec<Arc<dyn ResponseMiddleware>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder {
            config: EngineConfig::default(),
            scheduler: Arc::new(FifoScheduler::new()),
            downloader: None,
            request_middlewares: Vec::new(),
            response_middlewares: Vec::new(),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the downloader collaborator. Required.
    pub fn downloader(mut self, downloader: impl Downloader + 'static) -> Self {
        self.downloader = Some(Arc::new(downloader));
        self
    }

    /// Replaces the default FIFO scheduler.
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Arc::new(scheduler);
        self
    }

    /// Sets the number of concurrent workers. Values below 1 are rejected by
    /// [`build`](EngineBuilder::build).
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Sets the maximum crawl depth; requests beyond it are dropped before
    /// admission. 0 means unlimited.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Sets the fixed per-iteration worker delay.
    pub fn throttle(mut self, throttle: Duration) -> Self {
        self.config.throttle = throttle;
        self
    }

    /// Sets the termination probe's poll interval.
    pub fn probe_interval(mut self, interval: Duration) -> Self {
        self.config.probe_interval = interval;
        self
    }

    /// Sets the termination probe's debounce interval.
    pub fn probe_debounce(mut self, debounce: Duration) -> Self {
        self.config.probe_debounce = debounce;
        self
    }

    /// Sets the worker backoff on a transiently empty scheduler.
    pub fn pop_retry_interval(mut self, interval: Duration) -> Self {
        self.config.pop_retry_interval = interval;
        self
    }

    /// Enables bounded-exponential-backoff download retries: up to `retries`
    /// attempts after the first, starting at `backoff` and doubling.
    pub fn download_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.config.download_retries = retries;
        self.config.retry_backoff = backoff;
        self
    }

    /// Appends a request middleware; middlewares run in registration order
    /// just before spider matching and download.
    pub fn add_request_middleware(mut self, mw: impl RequestMiddleware + 'static) -> Self {
        self.request_middlewares.push(Arc::new(mw));
        self
    }

    /// Appends a response middleware; middlewares run in registration order
    /// right after the downloader returns.
    pub fn add_response_middleware(mut self, mw: impl ResponseMiddleware + 'static) -> Self {
        self.response_middlewares.push(Arc::new(mw));
        self
    }

    /// Validates the configuration and builds the engine.
    pub fn build(self) -> Result<Engine, Error> {
        if self.config.concurrency == 0 {
            return Err(Error::Configuration(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        let downloader = self.downloader.ok_or_else(|| {
            Error::Configuration("engine must have a downloader".to_string())
        })?;

        Ok(Engine::from_parts(
            self.scheduler,
            downloader,
            self.request_middlewares,
            self.response_middlewares,
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;
    use async_trait::async_trait;

    struct NoopDownloader;

    #[async_trait]
    impl Downloader for NoopDownloader {
        async fn download(&self, req: Request) -> Result<Response, Error> {
            Ok(Response::for_request(req, http::StatusCode::OK))
        }
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = EngineBuilder::new()
            .downloader(NoopDownloader)
            .concurrency(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn rejects_missing_downloader() {
        let err = EngineBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn builds_with_defaults() {
        assert!(EngineBuilder::new().downloader(NoopDownloader).build().is_ok());
    }
}
