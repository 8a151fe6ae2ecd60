use async_trait::async_trait;

use crate::domain::errors::IndexerError;

/// Defines common interface for chain processors
#[async_trait]
pub trait BlockchainProcessor: Send + Sync {
    /// Starts continuous block processing loop
    async fn start_processing(&mut self) -> Result<(), IndexerError>;
}
