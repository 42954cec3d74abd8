//! Packet callbacks of the packet forward middleware. Packets that carry no
//! forward instructions, or that were not forwarded by this chain, are
//! handed to the wrapped application untouched.
use ibc_app_transfer_types::packet::PacketData;
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::{ForwardMetadata, InFlightPacketKey};

use crate::context::{PacketForwardExecutionContext, PacketForwardValidationContext};
use crate::handler::forward_recv_packet_execute;
use crate::registry::InFlightPacketRegistry;
use crate::state_machine::{resolve_forwarded_packet, ForwardOutcome};

const TIMEOUT_REASON: &str = "forwarded packet timed out";

fn forwarded_key(packet: &Packet) -> InFlightPacketKey {
    InFlightPacketKey::new(
        packet.chan_id_on_a.clone(),
        packet.port_id_on_a.clone(),
        packet.seq_on_a,
    )
}

/// Whether `packet` was sent by this middleware and awaits resolution.
pub fn is_forwarded_packet(
    ctx: &impl PacketForwardValidationContext,
    packet: &Packet,
) -> Result<bool, PacketForwardError> {
    Ok(InFlightPacketRegistry::get(ctx.store(), &forwarded_key(packet))?.is_some())
}

pub fn on_recv_packet_execute(
    ctx: &mut impl PacketForwardExecutionContext,
    packet: &Packet,
    relayer: &Signer,
) -> (ModuleExtras, Option<Acknowledgement>) {
    let Ok(data) = serde_json::from_slice::<PacketData>(&packet.data) else {
        return ctx.next_on_recv_packet_execute(packet, relayer);
    };

    let metadata = match ForwardMetadata::from_memo(data.memo.as_ref()) {
        Ok(Some(metadata)) => metadata,
        Ok(None) => return ctx.next_on_recv_packet_execute(packet, relayer),
        Err(err) => {
            let ack = AcknowledgementStatus::error(err.into());
            return (ModuleExtras::empty(), Some(ack.into()));
        }
    };

    forward_recv_packet_execute(ctx, packet, data, metadata, relayer)
}

/// Checks the acknowledgement of a forwarded packet can be decoded.
///
/// Returns `false` for a packet this chain did not forward, which the
/// wrapped application validates instead.
pub fn on_acknowledgement_packet_validate(
    ctx: &impl PacketForwardValidationContext,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
) -> Result<bool, PacketForwardError> {
    if !is_forwarded_packet(ctx, packet)? {
        return Ok(false);
    }
    serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
        .map_err(|_| PacketForwardError::AckDeserialization)?;
    serde_json::from_slice::<PacketData>(&packet.data)
        .map_err(|_| PacketForwardError::PacketDataDeserialization)?;
    Ok(true)
}

pub fn on_acknowledgement_packet_execute(
    ctx: &mut impl PacketForwardExecutionContext,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    relayer: &Signer,
) -> (ModuleExtras, Result<(), PacketForwardError>) {
    match is_forwarded_packet(ctx, packet) {
        Ok(true) => {}
        Ok(false) => {
            return ctx.next_on_acknowledgement_packet_execute(packet, acknowledgement, relayer)
        }
        Err(err) => return (ModuleExtras::empty(), Err(err)),
    }

    let Ok(status) = serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
    else {
        return (
            ModuleExtras::empty(),
            Err(PacketForwardError::AckDeserialization),
        );
    };

    let outcome = match status {
        AcknowledgementStatus::Success(_) => ForwardOutcome::Acknowledged(acknowledgement.clone()),
        AcknowledgementStatus::Error(reason) => ForwardOutcome::Failed {
            reason: reason.to_string(),
        },
    };

    into_callback_result(resolve_forwarded_packet(ctx, packet, outcome))
}

/// Returns `false` for a packet this chain did not forward, which the
/// wrapped application validates instead.
pub fn on_timeout_packet_validate(
    ctx: &impl PacketForwardValidationContext,
    packet: &Packet,
) -> Result<bool, PacketForwardError> {
    if !is_forwarded_packet(ctx, packet)? {
        return Ok(false);
    }
    serde_json::from_slice::<PacketData>(&packet.data)
        .map_err(|_| PacketForwardError::PacketDataDeserialization)?;
    Ok(true)
}

pub fn on_timeout_packet_execute(
    ctx: &mut impl PacketForwardExecutionContext,
    packet: &Packet,
    relayer: &Signer,
) -> (ModuleExtras, Result<(), PacketForwardError>) {
    match is_forwarded_packet(ctx, packet) {
        Ok(true) => {}
        Ok(false) => return ctx.next_on_timeout_packet_execute(packet, relayer),
        Err(err) => return (ModuleExtras::empty(), Err(err)),
    }

    let outcome = ForwardOutcome::Failed {
        reason: TIMEOUT_REASON.to_string(),
    };
    into_callback_result(resolve_forwarded_packet(ctx, packet, outcome))
}

fn into_callback_result(
    result: Result<ModuleExtras, PacketForwardError>,
) -> (ModuleExtras, Result<(), PacketForwardError>) {
    match result {
        Ok(extras) => (extras, Ok(())),
        Err(err) => (ModuleExtras::empty(), Err(err)),
    }
}
