//! Storage seam used by the ingestion pipeline

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::domain::models::{Dimensions, ProviderStake};
use crate::domain::services::AssembledBlock;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::factory::RepositoryFactory;
use crate::infrastructure::persistence::repositories::{
    BlockRepository, DimensionRepository, FactRepository, Repositories,
};
use crate::utils::logging;

#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Last height of the unbroken run of committed heights starting at `from`,
    /// `None` when `from` itself is missing
    async fn contiguous_height(&self, from: u64) -> Result<Option<u64>, DbError>;

    async fn has_block(&self, height: u64) -> Result<bool, DbError>;

    /// Writes the block row, its new dimensions and all fact rows in one transaction
    async fn commit_block(&self, block: &AssembledBlock) -> Result<(), DbError>;

    /// Writes a metadata snapshot in one transaction; the stake rows replace the stored ones
    async fn sync_metadata(
        &self,
        dimensions: &Dimensions,
        stakes: &[ProviderStake],
    ) -> Result<(), DbError>;

    async fn load_dimensions(&self) -> Result<Dimensions, DbError>;
}

/// sea-orm backed store
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    conn: DatabaseConnection,
    repositories: Repositories,
}

impl DatabaseStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        let repositories = RepositoryFactory::from_connection(conn.clone());
        Self { conn, repositories }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    async fn write_block(txn: &DatabaseTransaction, block: &AssembledBlock) -> Result<(), DbError> {
        BlockRepository::insert(txn, &block.block).await?;
        DimensionRepository::insert_block_dimensions(txn, &block.dimensions.to_dimensions())
            .await?;
        FactRepository::insert_all(txn, block).await?;
        Ok(())
    }

    async fn write_metadata(
        txn: &DatabaseTransaction,
        dimensions: &Dimensions,
        stakes: &[ProviderStake],
    ) -> Result<(), DbError> {
        DimensionRepository::upsert_metadata(txn, dimensions).await?;
        DimensionRepository::replace_stakes(txn, stakes).await?;
        Ok(())
    }

    async fn finish(
        txn: DatabaseTransaction,
        outcome: Result<(), DbError>,
        context: &str,
    ) -> Result<(), DbError> {
        match outcome {
            Ok(()) => {
                txn.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_error) = txn.rollback().await {
                    logging::log_error(&format!(
                        "{} rollback failed: {}",
                        context, rollback_error
                    ));
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl BlockStore for DatabaseStore {
    async fn contiguous_height(&self, from: u64) -> Result<Option<u64>, DbError> {
        self.repositories.block.contiguous_height(from).await
    }

    async fn has_block(&self, height: u64) -> Result<bool, DbError> {
        self.repositories.block.exists(height).await
    }

    async fn commit_block(&self, block: &AssembledBlock) -> Result<(), DbError> {
        let txn = self.conn.begin().await?;
        let outcome = Self::write_block(&txn, block).await;
        Self::finish(txn, outcome, &format!("[block {}]", block.height())).await
    }

    async fn sync_metadata(
        &self,
        dimensions: &Dimensions,
        stakes: &[ProviderStake],
    ) -> Result<(), DbError> {
        let txn = self.conn.begin().await?;
        let outcome = Self::write_metadata(&txn, dimensions, stakes).await;
        Self::finish(txn, outcome, "[metadata]").await
    }

    async fn load_dimensions(&self) -> Result<Dimensions, DbError> {
        self.repositories.dimension.load_all().await
    }
}
