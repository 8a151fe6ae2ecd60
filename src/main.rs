use std::sync::Arc;

use anyhow::Context;

use lava_indexer::application::indexer::{BlockchainProcessor, LavaProcessor};
use lava_indexer::config::AppConfig;
use lava_indexer::domain::services::DimensionCache;
use lava_indexer::infrastructure::lava::{ChainClient, LavaRpcClient};
use lava_indexer::infrastructure::persistence::{BlockStore, DatabaseStore, DbPool};
use lava_indexer::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    logging::log_info(&format!("lava-indexer v{}", env!("CARGO_PKG_VERSION")));

    let config = AppConfig::from_env();
    logging::log_lava_endpoints(&config.lava.rpc_url, &config.lava.rest_url);

    let db_pool = DbPool::new(&config)
        .await
        .context("failed to connect to database")?;
    let store: Arc<dyn BlockStore> =
        Arc::new(DatabaseStore::new(db_pool.get_connection().clone()));

    let chain: Arc<dyn ChainClient> =
        Arc::new(LavaRpcClient::new(&config.lava).context("failed to build Lava client")?);

    let cache = Arc::new(DimensionCache::new());
    let mut processor = LavaProcessor::new(chain, store, cache, &config.indexer);

    let handle = tokio::spawn(async move { processor.start_processing().await });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    // Commits are atomic, so aborting mid-run leaves a consistent store
    handle.abort();
    logging::log_info("Indexer stopped");

    Ok(())
}
