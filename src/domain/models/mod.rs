pub mod block;
pub mod dimensions;
pub mod events;

pub use block::{BlockRecord, RawBlock, RawEvent};
pub use dimensions::{
    merge_moniker, ChainMetadata, Consumer, Dimensions, Plan, Provider, ProviderStake, Spec,
};
pub use events::{
    BlockReportEvent, ConflictResponseEvent, ConflictResponseRow, ConflictVoteEvent,
    ConflictVoteRow, EventRow, EventType, FreezeEvent, LavaEvent, ProviderBlockReportRow,
    QosScores, RelayPaymentEvent, RelayPaymentRow, StakeEvent, SubscriptionBuyEvent,
    SubscriptionBuyRow, UnfreezeEvent, UnstakeCommitEvent, VoteOutcomeEvent,
};
