//! Fans one item batch out to every pipeline interested in its name.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, error, warn};

use crate::items::Items;

use super::EngineInner;

/// Looks up the pipelines registered for the batch's name and runs their
/// handlers concurrently, joining all of them before returning. Handler
/// errors are logged independently and never propagate to the caller.
pub(crate) async fn dispatch_items(inner: &Arc<EngineInner>, items: Items) {
    if items.name().is_empty() {
        debug!("dropping item batch with empty name");
        inner.stats.increment_item_batches_dropped();
        return;
    }

    let handlers = inner.pipelines.read().get(items.name()).cloned();
    let Some(handlers) = handlers else {
        warn!(item = items.name(), "no pipeline associated with item batch");
        inner.stats.increment_item_batches_dropped();
        return;
    };

    let items = &items;
    join_all(handlers.iter().map(|pipeline| async move {
        if let Err(err) = pipeline.handle(items).await {
            error!(
                pipeline = pipeline.name(),
                item = items.name(),
                error = %err,
                "pipeline failed to handle item batch"
            );
        }
    }))
    .await;

    inner.stats.increment_item_batches_forwarded();
}
