use sea_orm::DatabaseConnection;

use crate::infrastructure::persistence::repositories::{
    BlockRepository, DimensionRepository, Repositories,
};

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories over an existing connection
    pub fn from_connection(conn: DatabaseConnection) -> Repositories {
        Repositories::new(
            Self::create_block_repository(conn.clone()),
            Self::create_dimension_repository(conn),
        )
    }

    /// Create a block repository
    pub fn create_block_repository(conn: DatabaseConnection) -> BlockRepository {
        BlockRepository::new(conn)
    }

    /// Create a dimension repository
    pub fn create_dimension_repository(conn: DatabaseConnection) -> DimensionRepository {
        DimensionRepository::new(conn)
    }
}
