//! Extracts the fields the rate limiter accounts for from an ICS-20 packet.
use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{is_receiver_chain_source, Amount, PrefixedDenom, TracePrefix};
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::ChannelId;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_middleware_primitives::ibc_denom;
use ibc_middleware_rate_limit_types::PacketDirection;

/// The transfer carried by a packet, seen from this chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitedPacketInfo {
    /// Channel of this chain the packet goes through.
    pub channel_id: ChannelId,
    /// Denom as known on this chain, hashed when it carries a trace.
    pub denom: String,
    pub amount: Amount,
    pub sender: Signer,
    pub receiver: Signer,
}

impl RateLimitedPacketInfo {
    /// Returns `None` for packets that are not ICS-20 transfers.
    pub fn from_packet(packet: &Packet, direction: PacketDirection) -> Option<Self> {
        let data = serde_json::from_slice::<PacketData>(&packet.data).ok()?;
        Some(Self::from_packet_data(packet, direction, data))
    }

    pub fn from_packet_data(packet: &Packet, direction: PacketDirection, data: PacketData) -> Self {
        let (channel_id, denom) = match direction {
            PacketDirection::Send => (packet.chan_id_on_a.clone(), data.token.denom),
            PacketDirection::Recv => (
                packet.chan_id_on_b.clone(),
                received_denom(packet, data.token.denom),
            ),
        };
        Self {
            channel_id,
            denom: local_denom(&denom),
            amount: data.token.amount,
            sender: data.sender,
            receiver: data.receiver,
        }
    }
}

/// Traces the denom of a received packet to its form on this chain.
fn received_denom(packet: &Packet, mut denom: PrefixedDenom) -> PrefixedDenom {
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

fn local_denom(denom: &PrefixedDenom) -> String {
    if denom.trace_path.is_empty() {
        denom.base_denom.to_string()
    } else {
        ibc_denom(&denom.to_string())
    }
}
