use std::sync::Arc;

use crate::domain::errors::IndexerError;
use crate::domain::services::{CacheStats, DimensionCache};
use crate::infrastructure::lava::ChainClient;
use crate::infrastructure::persistence::BlockStore;
use crate::utils::logging;

/// Keeps the dimension tables and the process-wide cache in line with the chain
#[derive(Clone)]
pub struct MetadataSynchronizer {
    chain: Arc<dyn ChainClient>,
    store: Arc<dyn BlockStore>,
    cache: Arc<DimensionCache>,
}

impl MetadataSynchronizer {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        store: Arc<dyn BlockStore>,
        cache: Arc<DimensionCache>,
    ) -> Self {
        Self {
            chain,
            store,
            cache,
        }
    }

    /// Loads every stored dimension row into the cache
    pub async fn warm_from_store(&self) -> Result<CacheStats, IndexerError> {
        let dimensions = self.store.load_dimensions().await?;
        self.cache.refresh(&dimensions);

        let stats = self.cache.stats();
        logging::log_info(&format!(
            "[metadata] cache warmed from store: {} providers, {} specs, {} plans, {} consumers",
            stats.providers, stats.specs, stats.plans, stats.consumers
        ));
        Ok(stats)
    }

    /// Pulls specs, stakes and plans from the chain, stores them, then refreshes the cache.
    ///
    /// On failure the cache keeps its previous contents.
    pub async fn refresh(&self) -> Result<CacheStats, IndexerError> {
        let metadata = self.chain.fetch_chain_metadata().await?;
        let stakes = metadata.current_stakes();
        let dimensions = metadata.into_dimensions();

        self.store.sync_metadata(&dimensions, &stakes).await?;
        self.cache.refresh(&dimensions);

        logging::log_info(&format!(
            "[metadata] synced {} specs, {} providers ({} stakes), {} plans",
            dimensions.specs.len(),
            dimensions.providers.len(),
            stakes.len(),
            dimensions.plans.len()
        ));
        Ok(self.cache.stats())
    }
}
