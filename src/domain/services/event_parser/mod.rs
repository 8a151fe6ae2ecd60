//! Event parser registry
//!
//! Maps one raw chain event to at most one typed [`LavaEvent`]. Parsing is pure:
//! a rejected event carries its reason back to the caller, which decides how to
//! log it. Unknown attribute keys are ignored and numbers never default to zero.

pub mod attributes;
mod block_report;
mod conflict;
mod freeze;
mod payment;
mod stake;

pub use attributes::RejectReason;

use crate::domain::models::{LavaEvent, RawEvent};
use attributes::Attributes;

/// Event kinds the indexer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StakeNewProvider,
    StakeUpdateProvider,
    ProviderUnstakeCommit,
    FreezeProvider,
    UnfreezeProvider,
    RelayPayment,
    SubscriptionBuy,
    ConflictResponse,
    ConflictVoteCommit,
    VoteResolved,
    VoteUnresolved,
    ProviderBlockReport,
}

impl EventKind {
    pub fn from_type_tag(type_tag: &str) -> Option<Self> {
        match type_tag {
            "lava_stake_new_provider" => Some(EventKind::StakeNewProvider),
            "lava_stake_update_provider" => Some(EventKind::StakeUpdateProvider),
            "lava_provider_unstake_commit" => Some(EventKind::ProviderUnstakeCommit),
            "lava_freeze_provider" => Some(EventKind::FreezeProvider),
            "lava_unfreeze_provider" => Some(EventKind::UnfreezeProvider),
            "lava_relay_payment" => Some(EventKind::RelayPayment),
            "lava_buy_subscription_event" => Some(EventKind::SubscriptionBuy),
            "lava_response_conflict_detection" => Some(EventKind::ConflictResponse),
            "lava_conflict_vote_got_commit" => Some(EventKind::ConflictVoteCommit),
            "lava_conflict_detection_vote_resolved" => Some(EventKind::VoteResolved),
            "lava_conflict_detection_vote_unresolved" => Some(EventKind::VoteUnresolved),
            "lava_provider_latest_block_report" => Some(EventKind::ProviderBlockReport),
            _ => None,
        }
    }
}

/// Result of parsing one raw event
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Accepted(LavaEvent),
    Rejected(RejectReason),
    /// The type tag carries nothing the indexer stores
    Ignored,
}

pub fn parse_event(event: &RawEvent) -> ParseOutcome {
    let Some(kind) = EventKind::from_type_tag(&event.type_tag) else {
        return ParseOutcome::Ignored;
    };

    match parse_kind(kind, &Attributes::new(&event.attributes)) {
        Ok(parsed) => ParseOutcome::Accepted(parsed),
        Err(reason) => ParseOutcome::Rejected(reason),
    }
}

fn parse_kind(kind: EventKind, attrs: &Attributes) -> Result<LavaEvent, RejectReason> {
    let event = match kind {
        EventKind::StakeNewProvider => LavaEvent::StakeNewProvider(stake::parse_stake(attrs)?),
        EventKind::StakeUpdateProvider => {
            LavaEvent::StakeUpdateProvider(stake::parse_stake(attrs)?)
        }
        EventKind::ProviderUnstakeCommit => {
            LavaEvent::ProviderUnstakeCommit(stake::parse_unstake_commit(attrs)?)
        }
        EventKind::FreezeProvider => LavaEvent::FreezeProvider(freeze::parse_freeze(attrs)?),
        EventKind::UnfreezeProvider => {
            LavaEvent::UnfreezeProvider(freeze::parse_unfreeze(attrs)?)
        }
        EventKind::RelayPayment => LavaEvent::RelayPayment(payment::parse_relay_payment(attrs)?),
        EventKind::SubscriptionBuy => {
            LavaEvent::SubscriptionBuy(payment::parse_subscription_buy(attrs)?)
        }
        EventKind::ConflictResponse => {
            LavaEvent::ConflictResponse(conflict::parse_conflict_response(attrs)?)
        }
        EventKind::ConflictVoteCommit => {
            LavaEvent::ConflictVoteCommit(conflict::parse_vote_commit(attrs)?)
        }
        EventKind::VoteResolved => LavaEvent::VoteResolved(conflict::parse_vote_resolved(attrs)?),
        EventKind::VoteUnresolved => {
            LavaEvent::VoteUnresolved(conflict::parse_vote_unresolved(attrs)?)
        }
        EventKind::ProviderBlockReport => {
            LavaEvent::ProviderBlockReport(block_report::parse_block_report(attrs)?)
        }
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_tags_are_ignored() {
        for tag in ["transfer", "message", "coin_spent", "lava_unknown_event"] {
            let event = RawEvent::new(tag, &[("sender", "someone")], Some("AA"));
            assert_eq!(parse_event(&event), ParseOutcome::Ignored);
        }
    }

    #[test]
    fn test_every_lava_tag_is_registered() {
        let tags = [
            "lava_stake_new_provider",
            "lava_stake_update_provider",
            "lava_provider_unstake_commit",
            "lava_freeze_provider",
            "lava_unfreeze_provider",
            "lava_relay_payment",
            "lava_buy_subscription_event",
            "lava_response_conflict_detection",
            "lava_conflict_vote_got_commit",
            "lava_conflict_detection_vote_resolved",
            "lava_conflict_detection_vote_unresolved",
            "lava_provider_latest_block_report",
        ];
        for tag in tags {
            assert!(EventKind::from_type_tag(tag).is_some(), "{} not registered", tag);
        }
    }

    #[test]
    fn test_recognized_event_without_attributes_is_rejected() {
        let event = RawEvent::new("lava_relay_payment", &[], None);
        assert!(matches!(parse_event(&event), ParseOutcome::Rejected(_)));
    }
}
