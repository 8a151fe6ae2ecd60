//! Typed Lava events and the fact rows they are lowered to

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Discriminant stored in `events.event_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    StakeNewProvider = 1,
    StakeUpdateProvider = 2,
    ProviderUnstakeCommit = 3,
    FreezeProvider = 4,
    UnfreezeProvider = 5,
    DetectionVoteResolved = 6,
    DetectionVoteUnresolved = 7,
}

impl EventType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// New stake or stake update for a provider on one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeEvent {
    pub provider: String,
    pub moniker: String,
    pub spec: String,
    pub stake_applied_block: Option<i64>,
    /// Stake in ulava
    pub stake: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstakeCommitEvent {
    pub provider: String,
    pub moniker: String,
    pub chain_id: String,
    pub stake: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeEvent {
    pub provider: String,
    pub chain_ids: Vec<String>,
    pub reason: Option<String>,
    pub request_block: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfreezeEvent {
    pub provider: String,
    pub chain_ids: Vec<String>,
    pub unfreeze_block: Option<i64>,
}

/// Quality-of-service scores reported with a relay payment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QosScores {
    pub availability: Option<f64>,
    pub latency: Option<f64>,
    pub sync: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayPaymentEvent {
    pub provider: String,
    pub consumer: String,
    pub spec_id: String,
    pub cu: i64,
    /// Base pay in ulava
    pub pay: i64,
    pub relays: Option<i64>,
    pub qos: QosScores,
    pub qos_excellence: QosScores,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionBuyEvent {
    pub consumer: String,
    pub plan: String,
    pub duration: i64,
}

/// A consumer reporting conflicting responses, which opens a vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictResponseEvent {
    pub consumer: String,
    pub spec_id: String,
    pub vote_id: String,
    pub api_interface: Option<String>,
    pub api_url: Option<String>,
    pub connection_type: Option<String>,
    pub request_block: Option<i64>,
    pub request_data: Option<String>,
    pub vote_deadline: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictVoteEvent {
    pub vote_id: String,
    pub provider: String,
}

/// Outcome of a conflict detection vote.
///
/// `winner` is always set for a resolved vote and absent for an unresolved one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcomeEvent {
    pub vote_id: Option<String>,
    pub winner: Option<String>,
    pub no_voters: Option<i64>,
    pub voters: Option<i64>,
    /// Reward pool in ulava
    pub reward_pool: Option<i64>,
    pub total_votes: Option<i64>,
}

/// Latest block heights a provider has seen, per served chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReportEvent {
    pub provider: String,
    pub chain_heights: BTreeMap<String, i64>,
}

/// A recognized and validated Lava event
#[derive(Debug, Clone, PartialEq)]
pub enum LavaEvent {
    StakeNewProvider(StakeEvent),
    StakeUpdateProvider(StakeEvent),
    ProviderUnstakeCommit(UnstakeCommitEvent),
    FreezeProvider(FreezeEvent),
    UnfreezeProvider(UnfreezeEvent),
    RelayPayment(RelayPaymentEvent),
    SubscriptionBuy(SubscriptionBuyEvent),
    ConflictResponse(ConflictResponseEvent),
    ConflictVoteCommit(ConflictVoteEvent),
    VoteResolved(VoteOutcomeEvent),
    VoteUnresolved(VoteOutcomeEvent),
    ProviderBlockReport(BlockReportEvent),
}

/// Row of the narrow `events` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub block_id: i64,
    pub tx: Option<String>,
    pub event_type: EventType,
    pub provider: Option<String>,
    pub consumer: Option<String>,
    pub t1: Option<String>,
    pub t2: Option<String>,
    pub i1: Option<i64>,
    pub i2: Option<i64>,
    pub b1: Option<i64>,
    pub b2: Option<i64>,
}

impl EventRow {
    /// Row with every slot empty
    pub fn new(block_id: i64, tx: Option<String>, event_type: EventType) -> Self {
        Self {
            block_id,
            tx,
            event_type,
            provider: None,
            consumer: None,
            t1: None,
            t2: None,
            i1: None,
            i2: None,
            b1: None,
            b2: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayPaymentRow {
    pub block_id: i64,
    pub tx: Option<String>,
    pub payment: RelayPaymentEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictResponseRow {
    pub block_id: i64,
    pub tx: Option<String>,
    pub response: ConflictResponseEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictVoteRow {
    pub block_id: i64,
    pub tx: Option<String>,
    pub vote: ConflictVoteEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionBuyRow {
    pub block_id: i64,
    pub tx: Option<String>,
    pub purchase: SubscriptionBuyEvent,
}

/// One chain height from a provider block report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderBlockReportRow {
    pub block_id: i64,
    pub tx: Option<String>,
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    pub chain_id: String,
    pub chain_block_height: i64,
}
