use std::collections::BTreeMap;

use super::attributes::{alphanumeric_key, parse_int, Attributes, RejectReason};
use crate::domain::models::BlockReportEvent;

const PROVIDER_KEY: &str = "provider";

/// Every key besides `provider` names a chain and carries that chain's latest height
pub(super) fn parse_block_report(attrs: &Attributes) -> Result<BlockReportEvent, RejectReason> {
    let provider = attrs.required_address(PROVIDER_KEY)?;

    let mut chain_heights = BTreeMap::new();
    for (key, value) in attrs.iter() {
        if key == PROVIDER_KEY {
            continue;
        }

        let chain_id = alphanumeric_key(key);
        if chain_id.is_empty() {
            continue;
        }

        let height = parse_int(value).ok_or_else(|| RejectReason::InvalidNumber {
            field: "chain height",
            value: format!("{}={}", key, value),
        })?;
        chain_heights.entry(chain_id).or_insert(height);
    }

    if chain_heights.is_empty() {
        return Err(RejectReason::NoChainHeights);
    }

    Ok(BlockReportEvent {
        provider,
        chain_heights,
    })
}

#[cfg(test)]
mod tests {
    use super::super::{parse_event, ParseOutcome};
    use crate::domain::models::{LavaEvent, RawEvent};
    use crate::domain::services::event_parser::RejectReason;

    const PROVIDER: &str = "lava@1wcw0xtpvfrernwhp6qj4v2hph25v78vtjupdly";

    #[test]
    fn test_block_report_collects_normalized_chain_keys() {
        let event = RawEvent::new(
            "lava_provider_latest_block_report",
            &[("provider", PROVIDER), ("ETH1", "19000123"), ("LAV-1", "341200")],
            None,
        );

        match parse_event(&event) {
            ParseOutcome::Accepted(LavaEvent::ProviderBlockReport(report)) => {
                assert_eq!(report.provider, PROVIDER);
                assert_eq!(report.chain_heights.len(), 2);
                assert_eq!(report.chain_heights.get("ETH1"), Some(&19_000_123));
                assert_eq!(report.chain_heights.get("LAV1"), Some(&341_200));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_block_report_without_chains_is_rejected() {
        let event = RawEvent::new(
            "lava_provider_latest_block_report",
            &[("provider", PROVIDER)],
            None,
        );

        assert_eq!(
            parse_event(&event),
            ParseOutcome::Rejected(RejectReason::NoChainHeights)
        );
    }
}
