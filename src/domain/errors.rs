use std::error::Error;
use std::fmt;

use crate::infrastructure::lava::ChainClientError;
use crate::infrastructure::persistence::error::DbError;

/// Error type for block ingestion and metadata sync
#[derive(Debug)]
pub enum IndexerError {
    ChainClientError(ChainClientError),
    DbError(DbError),
    ProcessingError(String),
}

impl fmt::Display for IndexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexerError::ChainClientError(e) => write!(f, "Chain client error: {}", e),
            IndexerError::DbError(e) => write!(f, "Database error: {}", e),
            IndexerError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for IndexerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IndexerError::ChainClientError(e) => Some(e),
            IndexerError::DbError(e) => Some(e),
            IndexerError::ProcessingError(_) => None,
        }
    }
}

impl From<ChainClientError> for IndexerError {
    fn from(error: ChainClientError) -> Self {
        IndexerError::ChainClientError(error)
    }
}

impl From<DbError> for IndexerError {
    fn from(error: DbError) -> Self {
        IndexerError::DbError(error)
    }
}
