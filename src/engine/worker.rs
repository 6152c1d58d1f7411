//! The dispatch loop each worker runs.
//!
//! A worker repeatedly pops a request, runs the request middlewares,
//! resolves the matching spiders, downloads, runs the response middlewares,
//! and hands the response to every matching spider concurrently. Every
//! failure along the way is isolated to the request or spider that produced
//! it and never takes the worker down.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use http::Method;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::request::Request;
use crate::response::{Context, Response};
use crate::scheduler::Popped;
use crate::spider::Spider;

use super::fanout::dispatch_items;
use super::EngineInner;

pub(crate) async fn run_worker(inner: Arc<EngineInner>, worker_id: usize) {
    debug!(worker_id, "worker started");

    loop {
        let Some(mut req) = next_request(&inner).await else {
            break;
        };

        if req.method.is_none() {
            req.method = Some(Method::GET);
        }

        if let Err(err) = apply_request_middlewares(&inner, &mut req) {
            error!(url = %req.url, error = %err, "request middleware failed, abandoning request");
            inner.stats.increment_requests_failed();
            continue;
        }
        if req.is_aborted() {
            // Aborted by a middleware: dropped silently, never downloaded.
            inner.stats.increment_requests_dropped();
            continue;
        }

        // Routing happens pre-fetch, by URL: a request no spider matches is
        // never downloaded. URL-rewriting middlewares have already run.
        let spiders = inner.matching_spiders(&req.url);
        if spiders.is_empty() {
            warn!(url = %req.url, "no spider found to handle request");
            inner.stats.increment_requests_dropped();
            continue;
        }

        let resp = match download(&inner, &req).await {
            Ok(resp) => resp,
            Err(err) => {
                error!(
                    method = %req.method_or_default(),
                    url = %req.url,
                    error = %err,
                    "download failed, abandoning request"
                );
                inner.stats.increment_requests_failed();
                continue;
            }
        };

        inner.stats.increment_responses_received();
        inner.stats.record_response_status(resp.status_code.as_u16());
        info!(
            method = %resp.request.method_or_default(),
            url = %resp.request.url,
            status = %resp.status,
            "downloaded"
        );

        handle_response(&inner, spiders, resp).await;

        if !inner.config.throttle.is_zero() {
            tokio::time::sleep(inner.config.throttle).await;
        }
    }

    debug!(worker_id, "worker exiting");
}

/// Pops the next request, retrying transient emptiness, and keeps the
/// pending-worker count accurate while this worker waits at the queue
/// boundary. Returns `None` only on true exhaustion.
async fn next_request(inner: &Arc<EngineInner>) -> Option<Request> {
    inner.state.pending_workers.fetch_add(1, Ordering::SeqCst);

    loop {
        match inner.scheduler.pop_request().await {
            Popped::Request(req) => {
                inner.state.pending_workers.fetch_sub(1, Ordering::SeqCst);
                return Some(req);
            }
            Popped::Empty => {
                tokio::time::sleep(inner.config.pop_retry_interval).await;
            }
            // The counter stays raised on exit; by now the engine is
            // stopping and the probe no longer acts on it.
            Popped::Closed => return None,
        }
    }
}

fn apply_request_middlewares(inner: &EngineInner, req: &mut Request) -> Result<(), Error> {
    for mw in &inner.request_middlewares {
        mw.handle(req)?;
        if req.is_aborted() {
            return Ok(());
        }
    }
    Ok(())
}

/// Invokes the downloader, retrying with bounded exponential backoff when
/// `download_retries` is configured.
async fn download(inner: &Arc<EngineInner>, req: &Request) -> Result<Response, Error> {
    let mut attempt = 0u32;
    loop {
        match inner.downloader.download(req.clone()).await {
            Ok(resp) => return Ok(resp),
            Err(err) if attempt < inner.config.download_retries => {
                let delay = inner.config.retry_backoff * 2u32.saturating_pow(attempt);
                warn!(
                    url = %req.url,
                    error = %err,
                    attempt = attempt + 1,
                    backoff_ms = delay.as_millis() as u64,
                    "download failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Runs response middlewares, then fans the response out to every matching
/// spider concurrently. A parse error or panic in one spider never affects
/// its siblings.
async fn handle_response(inner: &Arc<EngineInner>, spiders: Vec<Arc<dyn Spider>>, mut resp: Response) {
    for mw in &inner.response_middlewares {
        if let Err(err) = mw.handle(&mut resp) {
            error!(url = %resp.request.url, error = %err, "response middleware failed, dropping response");
            return;
        }
    }

    let resp = Arc::new(resp);
    let parent_depth = resp.request.depth();

    let mut tasks = JoinSet::new();
    for spider in spiders {
        let inner = Arc::clone(inner);
        let resp = Arc::clone(&resp);
        tasks.spawn(async move {
            let ctx = Context::new(resp);
            match spider.parse(&ctx).await {
                Ok(output) => {
                    if let Some(items) = output.items {
                        dispatch_items(&inner, items).await;
                    }
                    admit_requests(&inner, parent_depth, output.requests).await;
                }
                Err(err) => {
                    error!(spider = spider.name(), error = %err, "spider failed to parse response");
                    inner.stats.increment_parse_errors();
                }
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        if let Err(err) = res {
            if err.is_panic() {
                error!(error = %err, "spider task panicked while handling response");
            }
        }
    }
}

/// Depth-checks and admits follow-up requests inline, before the per-spider
/// task completes, so admission concurrency stays bounded by the worker pool.
async fn admit_requests(inner: &Arc<EngineInner>, parent_depth: usize, requests: Vec<Request>) {
    for mut req in requests {
        req.set_depth(parent_depth + 1);

        if inner.config.max_depth > 0 && req.depth() > inner.config.max_depth {
            debug!(
                max_depth = inner.config.max_depth,
                url = %req.url,
                "exceeds max crawling depth, dropping request"
            );
            inner.stats.increment_requests_dropped();
            continue;
        }

        info!(
            method = %req.method_or_default(),
            url = %req.url,
            depth = req.depth(),
            "adding new request"
        );
        if !inner.scheduler.push_request(req).await {
            // Scheduler closed; abandon the rest of this batch.
            return;
        }
        inner.stats.increment_requests_enqueued();
    }
}
