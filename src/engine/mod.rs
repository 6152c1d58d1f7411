//! # Engine Module
//!
//! The crawling engine: it manages the data flow between the scheduler, the
//! downloader and the registered spiders and pipelines.
//!
//! ## Key Components
//!
//! - **Engine**: registries, lifecycle, and the stop path
//! - **Worker loop**: pops requests, runs middlewares, downloads, and routes
//!   responses to matching spiders
//! - **Termination probe**: watches scheduler emptiness plus idle-worker
//!   count and stops the engine once the crawl has quiesced
//! - **Item fan-out**: delivers item batches to every interested pipeline
//!
//! Workers and the probe all run as tokio tasks sharing one `EngineInner`.

mod core;
mod fanout;
mod probe;
mod worker;

pub use self::core::Engine;
pub(crate) use self::core::EngineInner;
