//! Repository for blocks table
//! A block row is the idempotency guard for its height

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::fmt;

use crate::domain::models::BlockRecord;
use crate::infrastructure::persistence::entities::blocks;
use crate::infrastructure::persistence::error::DbError;

/// Heights read per query while walking the stored prefix
const PREFIX_SCAN_PAGE: u64 = 1000;

/// Converts a chain height into the stored `BIGINT` key
pub fn to_block_id(height: u64) -> Result<i64, DbError> {
    i64::try_from(height)
        .map_err(|_| DbError::OutOfRange(format!("height {} does not fit BIGINT", height)))
}

/// Repository for block operations
#[derive(Clone)]
pub struct BlockRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for BlockRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRepository").finish_non_exhaustive()
    }
}

impl BlockRepository {
    /// Create a new BlockRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// End of the unbroken run of stored heights starting at `from`.
    ///
    /// `None` when `from` itself is missing. Heights committed past a gap do not
    /// count, so a run interrupted while an earlier height kept failing resumes
    /// at that height.
    pub async fn contiguous_height(&self, from: u64) -> Result<Option<u64>, DbError> {
        let mut expected = to_block_id(from)?;
        let mut last = None;

        loop {
            let heights: Vec<i64> = blocks::Entity::find()
                .select_only()
                .column(blocks::Column::Height)
                .filter(blocks::Column::Height.gte(expected))
                .order_by_asc(blocks::Column::Height)
                .limit(PREFIX_SCAN_PAGE)
                .into_tuple()
                .all(&self.conn)
                .await?;

            let page_len = heights.len() as u64;
            for height in heights {
                if height != expected {
                    return Ok(last);
                }
                last = Some(height as u64);
                expected += 1;
            }

            if page_len < PREFIX_SCAN_PAGE {
                return Ok(last);
            }
        }
    }

    pub async fn exists(&self, height: u64) -> Result<bool, DbError> {
        let result = blocks::Entity::find_by_id(to_block_id(height)?)
            .one(&self.conn)
            .await?;

        Ok(result.is_some())
    }

    /// Insert the block row inside the caller's transaction
    pub async fn insert<C: ConnectionTrait>(db: &C, block: &BlockRecord) -> Result<(), DbError> {
        let model = blocks::ActiveModel {
            height: Set(to_block_id(block.height)?),
            timestamp: Set(block.timestamp.into()),
        };

        blocks::Entity::insert(model).exec_without_returning(db).await?;
        Ok(())
    }
}
