//! # Spider Module
//!
//! Defines the core `Spider` trait for implementing custom scrapers.
//!
//! A spider describes how a site (or group of sites) is crawled: which
//! requests start the crawl, which URLs it is responsible for, and how a
//! downloaded page is turned into structured items and follow-up requests.
//! The scraping cycle goes through something like this:
//!
//! 1. The engine loads the initial requests from [`Spider::start_requests`]
//!    into the scheduler (at depth 1).
//! 2. Each popped request is routed to every spider whose [`UrlMatcher`]
//!    matches the request URL, then downloaded once for all of them.
//! 3. [`Spider::parse`] extracts an optional [`Items`] batch, which the
//!    engine fans out to interested pipelines, and follow-up [`Request`]s,
//!    which are depth-checked and pushed back into the scheduler.

use async_trait::async_trait;

use crate::error::Error;
use crate::items::Items;
use crate::matcher::UrlMatcher;
use crate::request::Request;
use crate::response::Context;

/// What one parse step produced: at most one item batch and any number of
/// follow-up requests.
#[derive(Default)]
pub struct ParseOutput {
    pub items: Option<Items>,
    pub requests: Vec<Request>,
}

impl ParseOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the scraped item batch.
    pub fn with_items(mut self, items: Items) -> Self {
        self.items = Some(items);
        self
    }

    /// Adds a follow-up request to crawl.
    pub fn add_request(&mut self, req: Request) {
        self.requests.push(req);
    }
}

/// Defines the contract for a web spider.
#[async_trait]
pub trait Spider: Send + Sync {
    /// Unique spider name, used in log output.
    fn name(&self) -> &str;

    /// The seed requests loaded into the scheduler when the engine starts.
    fn start_requests(&self) -> Vec<Request>;

    /// Decides which request URLs this spider handles. Consulted before the
    /// download happens, so URL-rewriting middlewares run first.
    fn url_matcher(&self) -> &dyn UrlMatcher;

    /// Parses a response, extracting scraped items and new requests.
    ///
    /// Errors are isolated to this spider: siblings matched on the same
    /// response still run, and the worker carries on.
    async fn parse(&self, ctx: &Context) -> Result<ParseOutput, Error>;
}
