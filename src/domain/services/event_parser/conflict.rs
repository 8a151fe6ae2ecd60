use super::attributes::{Attributes, RejectReason};
use crate::domain::models::{ConflictResponseEvent, ConflictVoteEvent, VoteOutcomeEvent};

pub(super) fn parse_conflict_response(
    attrs: &Attributes,
) -> Result<ConflictResponseEvent, RejectReason> {
    Ok(ConflictResponseEvent {
        consumer: attrs.required_address("client")?,
        spec_id: attrs.required_text("chainID")?,
        vote_id: attrs.required_text("voteID")?,
        api_interface: attrs.text("apiInterface"),
        api_url: attrs.text("apiURL"),
        connection_type: attrs.text("connectionType"),
        request_block: attrs.int("requestBlock")?,
        request_data: attrs.text("requestData"),
        vote_deadline: attrs.int("voteDeadline")?,
    })
}

pub(super) fn parse_vote_commit(attrs: &Attributes) -> Result<ConflictVoteEvent, RejectReason> {
    Ok(ConflictVoteEvent {
        vote_id: attrs.required_text("voteID")?,
        provider: attrs.required_address("provider")?,
    })
}

fn parse_vote_outcome(attrs: &Attributes) -> Result<VoteOutcomeEvent, RejectReason> {
    Ok(VoteOutcomeEvent {
        vote_id: attrs.text("voteID"),
        winner: attrs.address("winner")?,
        no_voters: attrs.int("NumOfNoVoters")?,
        voters: attrs.int("NumOfVoters")?,
        reward_pool: attrs.ulava("RewardPool")?,
        total_votes: attrs.int("TotalVotes")?,
    })
}

/// A resolved vote must name its winner
pub(super) fn parse_vote_resolved(attrs: &Attributes) -> Result<VoteOutcomeEvent, RejectReason> {
    let outcome = parse_vote_outcome(attrs)?;
    if outcome.winner.is_none() {
        return Err(RejectReason::MissingField("winner"));
    }
    Ok(outcome)
}

pub(super) fn parse_vote_unresolved(
    attrs: &Attributes,
) -> Result<VoteOutcomeEvent, RejectReason> {
    let outcome = parse_vote_outcome(attrs)?;
    if outcome.vote_id.is_none() {
        return Err(RejectReason::MissingField("voteID"));
    }
    Ok(VoteOutcomeEvent {
        winner: None,
        ..outcome
    })
}
