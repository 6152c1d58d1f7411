//! Output pipelines for scraped item batches.

use async_trait::async_trait;

use crate::error::Error;
use crate::items::Items;

/// Consumes item batches the engine routes by name.
///
/// A pipeline declares the batch names it cares about via
/// [`item_list`](Pipeline::item_list); the engine builds a name → pipelines
/// mapping at registration time (duplicate names within one pipeline's list
/// are coalesced). Handlers for one batch run concurrently and each handler's
/// error is logged without affecting its siblings.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Pipeline name, used in log output.
    fn name(&self) -> &str;

    /// Every item-batch name this pipeline wants to receive.
    fn item_list(&self) -> Vec<String>;

    /// Handles one batch.
    async fn handle(&self, items: &Items) -> Result<(), Error>;
}
