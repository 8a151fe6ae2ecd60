use super::attributes::{Attributes, RejectReason};
use crate::domain::models::{StakeEvent, UnstakeCommitEvent};

/// `lava_stake_new_provider` and `lava_stake_update_provider` share one shape
pub(super) fn parse_stake(attrs: &Attributes) -> Result<StakeEvent, RejectReason> {
    Ok(StakeEvent {
        provider: attrs.required_address("provider")?,
        moniker: attrs.text("moniker").unwrap_or_default(),
        spec: attrs.required_text("spec")?,
        stake_applied_block: attrs.int("stakeAppliedBlock")?,
        stake: attrs.ulava("stake")?,
    })
}

pub(super) fn parse_unstake_commit(
    attrs: &Attributes,
) -> Result<UnstakeCommitEvent, RejectReason> {
    Ok(UnstakeCommitEvent {
        provider: attrs.required_address("address")?,
        moniker: attrs.text("moniker").unwrap_or_default(),
        chain_id: attrs.required_text("chainID")?,
        stake: attrs.ulava("stake")?,
    })
}
