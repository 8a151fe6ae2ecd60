//! Lava ingestion pipeline
//!
//! The poll loop drives catch-up runs; each run fetches, assembles and
//! commits blocks with bounded concurrency.

pub mod batch_orchestrator;
pub mod committer;
pub mod lava_processor;
pub mod metadata_sync;
pub mod processor_trait;
pub mod retry_handler;

pub use batch_orchestrator::{BatchOrchestrator, CatchUpReport, HeightOutcome};
pub use committer::BlockCommitter;
pub use lava_processor::{LavaProcessor, SyncGap, TickOutcome};
pub use metadata_sync::MetadataSynchronizer;
pub use processor_trait::BlockchainProcessor;
pub use retry_handler::RetryHandler;
