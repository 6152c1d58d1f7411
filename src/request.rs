//! Crawl request representation.
//!
//! A [`Request`] is mutable up to the point it is dispatched: request
//! middlewares may rewrite the URL or headers, or abort it entirely. While it
//! sits in a scheduler the scheduler owns it exclusively; ownership moves to
//! the worker that pops it.

use std::collections::HashMap;

use http::{HeaderMap, Method};
use serde_json::Value;

/// A pending fetch request.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method; `None` means "default to GET at dispatch".
    pub method: Option<Method>,
    /// Target URL. Spider routing matches against this string.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Query parameters, appended by the downloader.
    pub query: Vec<(String, String)>,
    /// Scheduling weight. Only meaningful to weight-aware schedulers.
    pub weight: i32,

    depth: usize,
    aborted: bool,
    ctx: HashMap<String, Value>,
}

impl Request {
    /// Creates a GET request for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Request {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the scheduling weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Number of fetch hops from the seed request that produced this one.
    /// Seed requests are at depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Aborts the request. Meant for request middlewares: an aborted request
    /// is dropped silently and never reaches the downloader or any spider.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    /// Returns true if the request has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Associates `value` with `key` on this request.
    pub fn with_context_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.ctx.insert(key.into(), value.into());
    }

    /// Returns the context value stored under `key`, if any.
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.ctx.get(key)
    }

    /// The effective HTTP method: the explicit one, or GET.
    pub fn method_or_default(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_get() {
        let req = Request::new("http://example.com");
        assert!(req.method.is_none());
        assert_eq!(req.method_or_default(), Method::GET);
    }

    #[test]
    fn abort_is_sticky() {
        let mut req = Request::new("http://example.com");
        assert!(!req.is_aborted());
        req.abort();
        assert!(req.is_aborted());
    }

    #[test]
    fn context_values_round_trip() {
        let mut req = Request::new("http://example.com");
        assert!(req.context_value("page").is_none());
        req.with_context_value("page", 3);
        assert_eq!(req.context_value("page"), Some(&Value::from(3)));
    }
}
