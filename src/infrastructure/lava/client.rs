use async_trait::async_trait;

use super::error::ChainClientError;
use crate::domain::models::{ChainMetadata, RawBlock};

/// Source of chain heights, raw blocks and chain metadata
#[async_trait]
pub trait ChainClient: Send + Sync + std::fmt::Debug {
    /// Get the client name for identification in logs
    fn client_name(&self) -> String;

    /// Latest height the node has committed
    async fn current_height(&self) -> Result<u64, ChainClientError>;

    /// Block timestamp plus every event emitted at `height`.
    ///
    /// Transaction events come first in transaction order, followed by
    /// block-level events which carry no transaction hash.
    async fn fetch_block(&self, height: u64) -> Result<RawBlock, ChainClientError>;

    /// Current specs, provider stakes and plans
    async fn fetch_chain_metadata(&self) -> Result<ChainMetadata, ChainClientError>;
}
