//! Implements the forwarding logic run when a transfer with forward
//! instructions is received.
mod on_recv_packet;

pub use on_recv_packet::*;

use ibc_app_transfer_types::{is_receiver_chain_source, PrefixedDenom, TracePrefix};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::PacketTimeoutHeight;
use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;

/// The denom of the tokens carried by `packet` as known on this chain, the
/// receiving end of `packet`.
pub fn denom_on_receiver(packet: &Packet, denom: &PrefixedDenom) -> PrefixedDenom {
    let mut denom = denom.clone();
    if is_receiver_chain_source(
        packet.port_id_on_a.clone(),
        packet.chan_id_on_a.clone(),
        &denom,
    ) {
        denom.remove_trace_prefix(&TracePrefix::new(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
        ));
    } else {
        denom.add_trace_prefix(TracePrefix::new(
            packet.port_id_on_b.clone(),
            packet.chan_id_on_b.clone(),
        ));
    }
    denom
}

/// Timeout timestamp and timeout height of `packet`, as recorded for the
/// refund of a forward.
pub fn packet_timeouts(packet: &Packet) -> (u64, PacketTimeoutHeight) {
    let raw = RawPacket::from(packet.clone());
    let height = raw
        .timeout_height
        .map(|height| PacketTimeoutHeight::new(height.revision_number, height.revision_height))
        .unwrap_or_default();
    (raw.timeout_timestamp, height)
}

/// Absolute timeout on the next hop of a send issued at `now`.
pub fn forward_timeout_timestamp(now: u64, timeout: u64) -> Result<u64, PacketForwardError> {
    now.checked_add(timeout)
        .ok_or_else(|| PacketForwardError::InvalidForwardMetadata {
            reason: format!("forward timeout {timeout} overflows"),
        })
}
