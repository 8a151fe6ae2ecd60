use super::attributes::{Attributes, RejectReason};
use crate::domain::models::{QosScores, RelayPaymentEvent, SubscriptionBuyEvent};

pub(super) fn parse_relay_payment(attrs: &Attributes) -> Result<RelayPaymentEvent, RejectReason> {
    Ok(RelayPaymentEvent {
        provider: attrs.required_address("provider")?,
        consumer: attrs.required_address("client")?,
        spec_id: attrs.required_text("chainID")?,
        cu: attrs.required_int("CU")?,
        pay: attrs.required_ulava("BasePay")?,
        relays: attrs.int("relayNumber")?,
        qos: QosScores {
            availability: attrs.score("QoSAvailability")?,
            latency: attrs.score("QoSLatency")?,
            sync: attrs.score("QoSSync")?,
        },
        qos_excellence: QosScores {
            availability: attrs.score("ExcellenceQoSAvailability")?,
            latency: attrs.score("ExcellenceQoSLatency")?,
            sync: attrs.score("ExcellenceQoSSync")?,
        },
    })
}

pub(super) fn parse_subscription_buy(
    attrs: &Attributes,
) -> Result<SubscriptionBuyEvent, RejectReason> {
    Ok(SubscriptionBuyEvent {
        consumer: attrs.required_address("consumer")?,
        plan: attrs.required_text("plan")?,
        duration: attrs.required_int("duration")?,
    })
}
