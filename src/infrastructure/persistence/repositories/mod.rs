pub mod block_repository;
pub mod dimension_repository;
pub mod fact_repository;

pub use block_repository::BlockRepository;
pub use dimension_repository::DimensionRepository;
pub use fact_repository::FactRepository;

/// Collection of all repositories
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Repository for block operations
    pub block: BlockRepository,
    /// Repository for dimension operations
    pub dimension: DimensionRepository,
}

impl Repositories {
    /// Create a new Repositories instance
    pub fn new(block: BlockRepository, dimension: DimensionRepository) -> Self {
        Self { block, dimension }
    }
}
