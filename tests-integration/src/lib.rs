//! Helpers shared by the integration tests of the IBC packet middlewares.
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::router::types::event::ModuleEvent;
use ibc_middleware_packet_forward::registry::InFlightPacketRegistry;
use ibc_middleware_packet_forward::types::{InFlightPacket, InFlightPacketKey};
use ibc_middleware_testkit::context::MockContext;

pub fn is_successful(ack: &Acknowledgement) -> bool {
    serde_json::from_slice::<AcknowledgementStatus>(ack.as_ref())
        .expect("valid acknowledgement")
        .is_successful()
}

/// Every in-flight packet recorded by the mock host.
pub fn in_flight_packets(ctx: &MockContext) -> Vec<(InFlightPacketKey, InFlightPacket)> {
    InFlightPacketRegistry::iterate_all(&ctx.store).expect("no error")
}

/// Value of the attribute `key` of `event`.
pub fn attribute<'a>(event: &'a ModuleEvent, key: &str) -> Option<&'a str> {
    event
        .attributes
        .iter()
        .find(|attr| attr.key == key)
        .map(|attr| attr.value.as_str())
}
