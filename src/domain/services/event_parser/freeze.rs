use super::attributes::{split_chain_ids, Attributes, RejectReason};
use crate::domain::models::{FreezeEvent, UnfreezeEvent};

pub(super) fn parse_freeze(attrs: &Attributes) -> Result<FreezeEvent, RejectReason> {
    Ok(FreezeEvent {
        provider: attrs.required_address("providerAddress")?,
        chain_ids: attrs.get("chainIDs").map(split_chain_ids).unwrap_or_default(),
        reason: attrs.text("freezeReason"),
        request_block: attrs.int("freezeRequestBlock")?,
    })
}

pub(super) fn parse_unfreeze(attrs: &Attributes) -> Result<UnfreezeEvent, RejectReason> {
    Ok(UnfreezeEvent {
        provider: attrs.required_address("providerAddress")?,
        chain_ids: attrs.get("chainIDs").map(split_chain_ids).unwrap_or_default(),
        unfreeze_block: attrs.int("unfreezeBlock")?,
    })
}
