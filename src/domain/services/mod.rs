pub mod block_assembler;
pub mod dimension_cache;
pub mod event_parser;

pub use block_assembler::{AssembledBlock, AssemblyStats, BlockAssembler};
pub use dimension_cache::{BlockDimensions, CacheStats, DimensionCache};
pub use event_parser::{parse_event, EventKind, ParseOutcome, RejectReason};
