//! A "prelude" for users of the `crawlkit` crate.
//!
//! Re-exports the most commonly used traits and structs so they can be
//! imported in one line.
//!
//! # Example
//!
//! ```
//! use crawlkit::prelude::*;
//! ```

pub use crate::{
    // Core structs
    Engine,
    EngineBuilder,
    Items,
    Request,
    Response,
    // Core traits
    Downloader,
    Pipeline,
    Scheduler,
    Spider,
    UrlMatcher,
    // Essential re-export for trait implementations
    async_trait,
    Context,
    Error,
    ParseOutput,
};
