//! Middleware interception points around the download step.
//!
//! Request middlewares run in registration order just before spider matching
//! and download; each may mutate the request in place or abort it via
//! [`Request::abort`]. Response middlewares run in registration order right
//! after the downloader hands a response back, before any spider sees it.
//!
//! Errors are isolated: a failing request middleware abandons that one
//! request, a failing response middleware aborts delivery of that one
//! response. Neither stops the worker.

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Intercepts a request before spider matching and download.
pub trait RequestMiddleware: Send + Sync {
    fn handle(&self, req: &mut Request) -> Result<(), Error>;
}

impl<F> RequestMiddleware for F
where
    F: Fn(&mut Request) -> Result<(), Error> + Send + Sync,
{
    fn handle(&self, req: &mut Request) -> Result<(), Error> {
        self(req)
    }
}

/// Intercepts a response before it is delivered to spiders.
pub trait ResponseMiddleware: Send + Sync {
    fn handle(&self, resp: &mut Response) -> Result<(), Error>;
}

impl<F> ResponseMiddleware for F
where
    F: Fn(&mut Response) -> Result<(), Error> + Send + Sync,
{
    fn handle(&self, resp: &mut Response) -> Result<(), Error> {
        self(resp)
    }
}
