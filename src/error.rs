//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the engine and its collaborators.
///
/// Nothing in the dispatch loop treats these as fatal: middleware, download,
/// parse and pipeline failures are logged and isolated to the request, spider
/// or pipeline that produced them.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid engine configuration, reported by the builder.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A downloader failed to fetch a request.
    #[error("download failed: {0}")]
    Download(String),

    /// Escape hatch for user-defined spiders, pipelines and middlewares.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
