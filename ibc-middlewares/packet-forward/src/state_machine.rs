//! Resolution of forwarded packets once the next hop acknowledges them or
//! they time out.
use ibc_app_transfer_types::packet::PacketData;
use ibc_core::channel::types::acknowledgement::{
    Acknowledgement, AcknowledgementStatus, StatusValue,
};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::module::ModuleExtras;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::events::{ForwardAction, PacketForwardEvent};
use ibc_middleware_packet_forward_types::{InFlightPacket, InFlightPacketKey};
use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use tracing::debug;

use crate::context::{ForwardTransfer, PacketForwardExecutionContext};
use crate::handler::forward_timeout_timestamp;
use crate::registry::InFlightPacketRegistry;

/// What the next hop reported about a forwarded packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Successful acknowledgement, relayed as-is to the original packet.
    Acknowledged(Acknowledgement),
    /// Error acknowledgement or timeout.
    Failed { reason: String },
}

/// The step taken on a forwarded packet given its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Relay the success acknowledgement and forget the packet.
    Finalize,
    /// Send the packet again, with one retry less.
    Retry { retries_remaining: u8 },
    /// Refund the original sender and acknowledge the original packet with
    /// an error.
    Refund,
    /// Forget the packet without refunding nor acknowledging.
    WriteOff,
}

/// Decides how to resolve `packet` given the `outcome` of its last send.
pub fn next_transition(packet: &InFlightPacket, outcome: &ForwardOutcome) -> Transition {
    match outcome {
        ForwardOutcome::Acknowledged(_) => Transition::Finalize,
        ForwardOutcome::Failed { .. } => match packet.retries_remaining.checked_sub(1) {
            Some(retries_remaining) => Transition::Retry { retries_remaining },
            None if packet.nonrefundable => Transition::WriteOff,
            None => Transition::Refund,
        },
    }
}

/// Rebuilds the packet received by this chain that `in_flight` was
/// forwarded from.
pub fn original_packet(in_flight: &InFlightPacket) -> Result<Packet, PacketForwardError> {
    let timeout_height = in_flight.packet_timeout_height;
    let timeout_height = (timeout_height.revision_number != 0
        || timeout_height.revision_height != 0)
        .then_some(RawHeight {
            revision_number: timeout_height.revision_number,
            revision_height: timeout_height.revision_height,
        });

    Packet::try_from(RawPacket {
        sequence: in_flight.refund_sequence.value(),
        source_port: in_flight.packet_src_port_id.to_string(),
        source_channel: in_flight.packet_src_channel_id.to_string(),
        destination_port: in_flight.refund_port_id.to_string(),
        destination_channel: in_flight.refund_channel_id.to_string(),
        data: in_flight.packet_data.clone(),
        timeout_height,
        timeout_timestamp: in_flight.packet_timeout_timestamp,
    })
    .map_err(|e| PacketForwardError::InvalidInFlightPacket {
        reason: e.to_string(),
    })
}

/// Resolves the in-flight packet recorded for the `forwarded` packet.
///
/// Every host effect of the transition runs before the registry is updated,
/// so a failing effect leaves the record in place.
pub fn resolve_forwarded_packet<Ctx>(
    ctx: &mut Ctx,
    forwarded: &Packet,
    outcome: ForwardOutcome,
) -> Result<ModuleExtras, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    let key = InFlightPacketKey::new(
        forwarded.chan_id_on_a.clone(),
        forwarded.port_id_on_a.clone(),
        forwarded.seq_on_a,
    );
    let in_flight = InFlightPacketRegistry::get(ctx.store(), &key)?
        .ok_or_else(|| PacketForwardError::InFlightPacketNotFound(key.clone()))?;

    let transition = next_transition(&in_flight, &outcome);
    debug!(%key, ?transition, "resolving forwarded packet");

    let reason = match outcome {
        ForwardOutcome::Acknowledged(acknowledgement) => {
            ctx.write_ack_and_events(&original_packet(&in_flight)?, &acknowledgement)?;
            InFlightPacketRegistry::delete(ctx.store_mut(), &key)?;
            return Ok(extras_with_event(
                event(ForwardAction::Success, key, &in_flight, None),
                "forwarded packet acknowledged",
            ));
        }
        ForwardOutcome::Failed { reason } => reason,
    };

    // the intermediate account gets back the tokens of the failed send
    let forwarded_data = serde_json::from_slice::<PacketData>(&forwarded.data)
        .map_err(|_| PacketForwardError::PacketDataDeserialization)?;
    ctx.receive_refund_execute(forwarded, &forwarded_data)?;

    match transition {
        Transition::Retry { retries_remaining } => {
            let timeout_timestamp_on_b =
                forward_timeout_timestamp(ctx.host_timestamp()?, in_flight.timeout)?;
            let sequence = ctx.send_transfer_execute(ForwardTransfer {
                port_id_on_a: forwarded.port_id_on_a.clone(),
                chan_id_on_a: forwarded.chan_id_on_a.clone(),
                token: forwarded_data.token,
                sender: forwarded_data.sender,
                receiver: forwarded_data.receiver,
                memo: forwarded_data.memo,
                timeout_timestamp_on_b,
            })?;

            let retried_key = InFlightPacketKey::new(
                forwarded.chan_id_on_a.clone(),
                forwarded.port_id_on_a.clone(),
                sequence,
            );
            let retried = InFlightPacket {
                retries_remaining,
                ..in_flight
            };
            InFlightPacketRegistry::delete(ctx.store_mut(), &key)?;
            InFlightPacketRegistry::put(ctx.store_mut(), retried_key.clone(), &retried)?;

            Ok(extras_with_event(
                event(ForwardAction::Retry, retried_key, &retried, Some(reason)),
                "forwarded packet sent again",
            ))
        }
        Transition::Refund => {
            let original = original_packet(&in_flight)?;
            ctx.send_refund_execute(&in_flight)?;
            ctx.write_ack_and_events(&original, &error_acknowledgement(&reason))?;
            InFlightPacketRegistry::delete(ctx.store_mut(), &key)?;

            Ok(extras_with_event(
                event(ForwardAction::Refund, key, &in_flight, Some(reason)),
                "forwarded packet refunded",
            ))
        }
        Transition::WriteOff => {
            InFlightPacketRegistry::delete(ctx.store_mut(), &key)?;

            Ok(extras_with_event(
                event(ForwardAction::WriteOff, key, &in_flight, Some(reason)),
                "nonrefundable forwarded packet written off",
            ))
        }
        Transition::Finalize => Err(PacketForwardError::host(
            "failed forward cannot be finalized",
        )),
    }
}

fn error_acknowledgement(reason: &str) -> Acknowledgement {
    let status = StatusValue::new(format!("packet forward failed: {reason}"))
        .expect("error message must not be empty");
    AcknowledgementStatus::error(status).into()
}

fn event(
    action: ForwardAction,
    forward_key: InFlightPacketKey,
    in_flight: &InFlightPacket,
    error: Option<String>,
) -> PacketForwardEvent {
    PacketForwardEvent {
        action,
        forward_key,
        original_sender: in_flight.original_sender_address.clone(),
        refund_channel_id: in_flight.refund_channel_id.clone(),
        refund_sequence: in_flight.refund_sequence,
        retries_remaining: in_flight.retries_remaining,
        error,
    }
}

fn extras_with_event(event: PacketForwardEvent, log: &str) -> ModuleExtras {
    ModuleExtras {
        events: vec![event.into()],
        log: vec![log.to_string()],
    }
}
