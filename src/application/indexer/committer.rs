use std::sync::Arc;

use crate::domain::errors::IndexerError;
use crate::domain::services::{AssembledBlock, DimensionCache};
use crate::infrastructure::persistence::BlockStore;
use crate::utils::logging;

/// Commits assembled blocks and publishes their dimensions once durable
#[derive(Clone)]
pub struct BlockCommitter {
    store: Arc<dyn BlockStore>,
    cache: Arc<DimensionCache>,
}

impl BlockCommitter {
    pub fn new(store: Arc<dyn BlockStore>, cache: Arc<DimensionCache>) -> Self {
        Self { store, cache }
    }

    /// One transaction per block; the shared cache only sees committed dimensions
    pub async fn commit(&self, block: &AssembledBlock) -> Result<(), IndexerError> {
        self.store.commit_block(block).await?;

        if !block.dimensions.is_empty() {
            self.cache.merge(&block.dimensions);
        }

        let facts = block.fact_count();
        let message = format!(
            "[block {}] committed {} fact rows ({} rejected, {} ignored events)",
            block.height(),
            facts,
            block.stats.rejected,
            block.stats.ignored
        );
        if facts > 0 || block.stats.rejected > 0 {
            logging::log_info(&message);
        } else {
            logging::log_debug(&message);
        }

        Ok(())
    }
}
