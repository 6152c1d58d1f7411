//! # crawlkit
//!
//! A concurrent crawling engine: a pool of workers drains a pluggable
//! scheduler, downloads each request through an injected [`Downloader`],
//! routes the response to every [`Spider`] whose URL matcher matches, and
//! fans extracted [`Items`] out to interested [`Pipeline`]s. A termination
//! probe stops the engine once no more work can ever arrive.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawlkit::prelude::*;
//! use crawlkit::{ExactMatcher, UrlMatcher};
//!
//! struct QuoteSpider {
//!     matcher: ExactMatcher,
//! }
//!
//! #[async_trait]
//! impl Spider for QuoteSpider {
//!     fn name(&self) -> &str { "quotes" }
//!
//!     fn start_requests(&self) -> Vec<Request> {
//!         vec![Request::new("http://quotes.example.com")]
//!     }
//!
//!     fn url_matcher(&self) -> &dyn UrlMatcher { &self.matcher }
//!
//!     async fn parse(&self, ctx: &Context) -> Result<ParseOutput, Error> {
//!         let items = Items::new("quote");
//!         items.insert("url", ctx.request().url.clone());
//!         Ok(ParseOutput::new().with_items(items))
//!     }
//! }
//!
//! async fn crawl() -> Result<(), Error> {
//!     let engine = EngineBuilder::new()
//!         .downloader(MyDownloader::default())
//!         .concurrency(4)
//!         .build()?;
//!     engine.register_spider(QuoteSpider { matcher: ExactMatcher::new("http://quotes.example.com") });
//!     engine.run().await;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod downloader;
pub mod engine;
pub mod error;
pub mod items;
pub mod matcher;
pub mod middleware;
pub mod pipeline;
pub mod prelude;
pub mod request;
pub mod response;
pub mod scheduler;
pub mod spider;
pub mod state;
pub mod stats;

pub use builder::{EngineBuilder, EngineConfig};
pub use downloader::Downloader;
pub use engine::Engine;
pub use error::Error;
pub use items::Items;
pub use matcher::{ExactMatcher, RegexMatcher, UrlMatcher};
pub use middleware::{RequestMiddleware, ResponseMiddleware};
pub use pipeline::Pipeline;
pub use request::Request;
pub use response::{Context, Document, Response};
pub use scheduler::{FifoScheduler, Popped, Scheduler, WeightedScheduler};
pub use spider::{ParseOutput, Spider};
pub use stats::StatCollector;

pub use async_trait::async_trait;
pub use dashmap::DashMap;
pub use tokio;
