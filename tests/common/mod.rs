#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lava_indexer::application::indexer::{BatchOrchestrator, LavaProcessor};
use lava_indexer::config::IndexerConfig;
use lava_indexer::domain::models::{ChainMetadata, RawBlock, RawEvent};
use lava_indexer::domain::services::DimensionCache;
use lava_indexer::infrastructure::lava::{ChainClient, ChainClientError};
use lava_indexer::infrastructure::persistence::DatabaseStore;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub const PROVIDER: &str = "lava@1wcw0xtpvfrernwhp6qj4v2hph25v78vtjupdly";
pub const OTHER_PROVIDER: &str = "lava@1p0w4s7e6qkx4f3e0n3a8jqxw5j0a8y2ffzsq0t";
pub const CONSUMER: &str = "lava@1qu0jm3ahqrxhx0l8lfhzryr5kqrqdtf3l2pcv8";

/// In-memory chain with per-height failure injection
#[derive(Debug, Default)]
pub struct ScriptedChain {
    tip: AtomicU64,
    unavailable: AtomicBool,
    metadata_unavailable: AtomicBool,
    blocks: Mutex<HashMap<u64, Vec<RawEvent>>>,
    failures: Mutex<HashMap<u64, u32>>,
    fetched: Mutex<Vec<u64>>,
    metadata: Mutex<ChainMetadata>,
    metadata_calls: AtomicUsize,
}

impl ScriptedChain {
    pub fn new(tip: u64) -> Arc<Self> {
        let chain = Self::default();
        chain.tip.store(tip, Ordering::SeqCst);
        Arc::new(chain)
    }

    pub fn set_tip(&self, tip: u64) {
        self.tip.store(tip, Ordering::SeqCst);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_metadata_unavailable(&self, unavailable: bool) {
        self.metadata_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_events(&self, height: u64, events: Vec<RawEvent>) {
        self.blocks.lock().unwrap().insert(height, events);
    }

    /// The next `times` fetches of `height` fail
    pub fn fail_height(&self, height: u64, times: u32) {
        self.failures.lock().unwrap().insert(height, times);
    }

    pub fn set_metadata(&self, metadata: ChainMetadata) {
        *self.metadata.lock().unwrap() = metadata;
    }

    pub fn fetched(&self) -> Vec<u64> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn clear_fetched(&self) {
        self.fetched.lock().unwrap().clear();
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    fn client_name(&self) -> String {
        "scripted chain".to_string()
    }

    async fn current_height(&self) -> Result<u64, ChainClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ChainClientError::RpcError("node unreachable".to_string()));
        }
        Ok(self.tip.load(Ordering::SeqCst))
    }

    async fn fetch_block(&self, height: u64) -> Result<RawBlock, ChainClientError> {
        self.fetched.lock().unwrap().push(height);

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&height) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(ChainClientError::RpcError(format!(
                        "injected failure at {}",
                        height
                    )));
                }
            }
        }

        let events = self
            .blocks
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .unwrap_or_default();

        Ok(RawBlock {
            height,
            timestamp: block_time(height),
            events,
        })
    }

    async fn fetch_chain_metadata(&self) -> Result<ChainMetadata, ChainClientError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if self.metadata_unavailable.load(Ordering::SeqCst) {
            return Err(ChainClientError::RpcError("gateway unreachable".to_string()));
        }
        Ok(self.metadata.lock().unwrap().clone())
    }
}

pub fn block_time(height: u64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_709_294_400 + height as i64 * 15, 0)
        .single()
        .unwrap()
}

/// Migrated in-memory SQLite database; a single connection keeps it alive
pub async fn sqlite_connection() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let conn = Database::connect(options).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    conn
}

pub async fn sqlite_store() -> Arc<DatabaseStore> {
    Arc::new(DatabaseStore::new(sqlite_connection().await))
}

pub fn test_config() -> IndexerConfig {
    IndexerConfig {
        genesis_block_height: 1,
        poll_interval_ms: 10,
        chunk_size: 4,
        concurrency: 2,
        retry_base_delay_ms: 0,
        retry_max_delay_ms: 0,
        retry_warn_attempts: 3,
    }
}

pub fn orchestrator(
    chain: &Arc<ScriptedChain>,
    store: &Arc<DatabaseStore>,
    cache: &Arc<DimensionCache>,
) -> BatchOrchestrator {
    BatchOrchestrator::new(chain.clone(), store.clone(), cache.clone(), &test_config())
}

pub fn processor(
    chain: &Arc<ScriptedChain>,
    store: &Arc<DatabaseStore>,
    cache: &Arc<DimensionCache>,
) -> LavaProcessor {
    LavaProcessor::new(chain.clone(), store.clone(), cache.clone(), &test_config())
}

pub fn stake_event(provider: &str, moniker: &str, spec: &str, tx: &str) -> RawEvent {
    RawEvent::new(
        "lava_stake_new_provider",
        &[
            ("provider", provider),
            ("moniker", moniker),
            ("spec", spec),
            ("stakeAppliedBlock", "1"),
            ("stake", "50000000000ulava"),
        ],
        Some(tx),
    )
}

pub fn relay_payment(provider: &str, spec: &str, cu: &str, tx: &str) -> RawEvent {
    RawEvent::new(
        "lava_relay_payment",
        &[
            ("provider", provider),
            ("client", CONSUMER),
            ("chainID", spec),
            ("CU", cu),
            ("BasePay", "1200ulava"),
            ("relayNumber", "15"),
            ("QoSAvailability", "1.0"),
            ("QoSLatency", "0.25"),
            ("QoSSync", "0.75"),
        ],
        Some(tx),
    )
}

pub fn subscription_buy(plan: &str, tx: &str) -> RawEvent {
    RawEvent::new(
        "lava_buy_subscription_event",
        &[("consumer", CONSUMER), ("plan", plan), ("duration", "3")],
        Some(tx),
    )
}
