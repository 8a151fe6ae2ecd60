//! Catch-up and poll loop
//!
//! Every tick compares the chain tip with the end of the contiguous run of
//! committed heights, closes the gap through the batch orchestrator, and
//! refreshes chain metadata once the indexer is following the tip block by
//! block. Heights committed past a hole are skipped by the catch-up, so a
//! height that failed in an earlier run is retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use super::batch_orchestrator::{BatchOrchestrator, CatchUpReport};
use super::metadata_sync::MetadataSynchronizer;
use super::processor_trait::BlockchainProcessor;
use super::retry_handler::RetryHandler;
use crate::config::IndexerConfig;
use crate::domain::errors::IndexerError;
use crate::domain::services::DimensionCache;
use crate::infrastructure::lava::ChainClient;
use crate::infrastructure::persistence::BlockStore;
use crate::utils::logging;

/// Inclusive range of heights missing from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncGap {
    pub from: u64,
    pub to: u64,
}

impl SyncGap {
    /// Heights to ingest given the stored high-water mark; an empty store starts at genesis
    pub fn between(stored: Option<u64>, genesis: u64, chain_height: u64) -> Option<SyncGap> {
        let from = match stored {
            Some(height) => height + 1,
            None => genesis,
        };
        if chain_height >= from {
            Some(SyncGap {
                from,
                to: chain_height,
            })
        } else {
            None
        }
    }

    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    /// A single new block means the indexer is following the tip
    pub fn is_steady_state(&self) -> bool {
        self.from == self.to
    }
}

/// Result of one poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    ChainUnavailable,
    StoreUnavailable,
    UpToDate { chain_height: u64 },
    Synced {
        gap: SyncGap,
        report: CatchUpReport,
        /// Whether chain metadata was refreshed after the catch-up
        refreshed: bool,
    },
}

pub struct LavaProcessor {
    chain: Arc<dyn ChainClient>,
    store: Arc<dyn BlockStore>,
    orchestrator: BatchOrchestrator,
    metadata: MetadataSynchronizer,
    retry_handler: RetryHandler,
    genesis_block_height: u64,
    /// Start of the prefix scan; every height from here up to the last tick's mark is stored
    committed_floor: u64,
    poll_interval: Duration,
}

impl LavaProcessor {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        store: Arc<dyn BlockStore>,
        cache: Arc<DimensionCache>,
        config: &IndexerConfig,
    ) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(
                chain.clone(),
                store.clone(),
                cache.clone(),
                config,
            ),
            metadata: MetadataSynchronizer::new(chain.clone(), store.clone(), cache),
            retry_handler: RetryHandler::from_indexer_config(config),
            chain,
            store,
            genesis_block_height: config.genesis_block_height,
            committed_floor: config.genesis_block_height,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Warms the cache from the store, then syncs chain metadata; neither failure is fatal
    pub async fn initialize(&self) {
        if let Err(e) = self
            .retry_handler
            .execute_with_retry_and_logging(
                || self.metadata.warm_from_store(),
                "cache warm-up",
                "startup",
            )
            .await
        {
            logging::log_error(&format!(
                "[startup] continuing with a cold dimension cache: {}",
                e
            ));
        }

        if let Err(e) = self.metadata.refresh().await {
            logging::log_error(&format!("[startup] metadata sync failed: {}", e));
        }
    }

    /// One pass of the poll loop
    pub async fn tick(&mut self) -> TickOutcome {
        let chain_height = match self.chain.current_height().await {
            Ok(height) => height,
            Err(e) => {
                logging::log_error(&format!(
                    "[poll] failed to read chain height from {}: {}",
                    self.chain.client_name(),
                    e
                ));
                return TickOutcome::ChainUnavailable;
            }
        };

        let stored = match self.store.contiguous_height(self.committed_floor).await {
            Ok(stored) => stored,
            Err(e) => {
                logging::log_error(&format!("[poll] failed to read stored height: {}", e));
                return TickOutcome::StoreUnavailable;
            }
        };

        if let Some(height) = stored {
            self.committed_floor = height;
        }

        let Some(gap) = SyncGap::between(stored, self.genesis_block_height, chain_height) else {
            logging::log_debug(&format!("[poll] up to date at {}", chain_height));
            return TickOutcome::UpToDate { chain_height };
        };

        let report = self.orchestrator.run_catch_up(gap.from, gap.to).await;

        let mut refreshed = false;
        if gap.is_steady_state() {
            match self.metadata.refresh().await {
                Ok(_) => refreshed = true,
                Err(e) => logging::log_error(&format!(
                    "[poll] metadata refresh failed, keeping cached dimensions: {}",
                    e
                )),
            }
        }

        TickOutcome::Synced {
            gap,
            report,
            refreshed,
        }
    }
}

#[async_trait]
impl BlockchainProcessor for LavaProcessor {
    async fn start_processing(&mut self) -> Result<(), IndexerError> {
        logging::log_info(&format!(
            "[poll] following {} every {}ms from genesis {}",
            self.chain.client_name(),
            self.poll_interval.as_millis(),
            self.genesis_block_height
        ));

        self.initialize().await;

        loop {
            self.tick().await;
            time::sleep(self.poll_interval).await;
        }
    }
}
