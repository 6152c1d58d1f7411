//! Downloaded response and the parse context handed to spiders.

use std::any::Any;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::request::Request;

/// An opaque, queryable parsed-document handle attached to a [`Response`].
///
/// The engine never inspects document contents; it only carries the handle
/// from the downloader to the spiders, which downcast it to whatever concrete
/// parser output their downloader produces.
pub trait Document: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A fully downloaded response.
///
/// Immutable once constructed by the downloader; during per-spider fan-out
/// all matching spiders share it behind an `Arc`.
#[derive(Clone)]
pub struct Response {
    /// Status line, e.g. `"200 OK"`.
    pub status: String,
    /// Numeric status code.
    pub status_code: StatusCode,
    /// Length of the associated content as reported by the downloader.
    pub content_length: u64,
    /// The request that produced this response (shared, read-only).
    pub request: Arc<Request>,
    /// Parsed document handle, if the downloader produced one.
    pub document: Option<Arc<dyn Document>>,
    /// Raw response body.
    pub body: Bytes,
    /// Response headers.
    pub headers: HeaderMap,
}

impl Response {
    /// Builds a minimal response for `request`, letting the caller fill in
    /// the remaining fields. Mainly useful to downloader implementations.
    pub fn for_request(request: Request, status_code: StatusCode) -> Self {
        Response {
            status: format!(
                "{} {}",
                status_code.as_u16(),
                status_code.canonical_reason().unwrap_or("")
            ),
            status_code,
            content_length: 0,
            request: Arc::new(request),
            document: None,
            body: Bytes::new(),
            headers: HeaderMap::new(),
        }
    }
}

/// The scraping context handed to [`Spider::parse`](crate::Spider::parse).
///
/// Wraps the shared response and gives convenient access to the originating
/// request and the parsed document.
pub struct Context {
    response: Arc<Response>,
}

impl Context {
    pub(crate) fn new(response: Arc<Response>) -> Self {
        Context { response }
    }

    /// The downloaded response.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// The request that was sent to obtain this response.
    pub fn request(&self) -> &Request {
        &self.response.request
    }

    /// The parsed document handle, if any.
    pub fn document(&self) -> Option<&dyn Document> {
        self.response.document.as_deref()
    }
}
