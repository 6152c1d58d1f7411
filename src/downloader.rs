//! The downloader collaborator contract.

use async_trait::async_trait;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Fetches a request and returns a fully populated response.
///
/// Implementations live outside the engine core (HTTP clients, headless
/// browsers, caches). The engine treats a download error as a per-request
/// failure: it is logged and the request abandoned, optionally after the
/// configured number of backoff retries. Timeouts, if any, are the
/// downloader's own concern.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, req: Request) -> Result<Response, Error>;
}
