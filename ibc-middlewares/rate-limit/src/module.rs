//! Packet callbacks of the rate limit middleware.
//!
//! The host runs these before handing the packet to the wrapped transfer
//! application on receive, and after it on send, acknowledgement and
//! timeout. Packets that are not ICS-20 transfers are not accounted for.
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_middleware_rate_limit_types::error::RateLimitError;
use ibc_middleware_rate_limit_types::{PacketDirection, PendingSendPacketKey, RateLimitKey};
use tracing::debug;

use crate::context::RateLimitExecutionContext;
use crate::keeper::RateLimitKeeper;
use crate::packet::RateLimitedPacketInfo;
use crate::rate_limiter::{check_rate_limit_and_update_flow, undo_send_packet};

fn pending_key(packet: &Packet) -> PendingSendPacketKey {
    PendingSendPacketKey::new(packet.chan_id_on_a.clone(), packet.seq_on_a)
}

/// Counts an outgoing transfer. An error rejects the send.
pub fn on_send_packet_execute(
    ctx: &mut impl RateLimitExecutionContext,
    packet: &Packet,
) -> Result<(), RateLimitError> {
    let Some(info) = RateLimitedPacketInfo::from_packet(packet, PacketDirection::Send) else {
        return Ok(());
    };
    if !check_rate_limit_and_update_flow(ctx, PacketDirection::Send, &info)? {
        return Ok(());
    }

    let key = pending_key(packet);
    let window_start = RateLimitKeeper::get_rate_limit(
        ctx.store(),
        &RateLimitKey::new(info.denom, info.channel_id),
    )?
    .map(|rate_limit| rate_limit.flow.window_start)
    .ok_or_else(|| RateLimitError::host("updated rate limit vanished"))?;
    debug!(channel = %key.channel_id, sequence = %key.sequence, "recording pending send");
    RateLimitKeeper::set_pending_send_packet(ctx.store_mut(), &key, window_start)
}

/// Counts an incoming transfer. A denied transfer is answered with an error
/// acknowledgement; otherwise the packet continues to the wrapped
/// application.
pub fn on_recv_packet_execute(
    ctx: &mut impl RateLimitExecutionContext,
    packet: &Packet,
) -> Option<Acknowledgement> {
    let info = RateLimitedPacketInfo::from_packet(packet, PacketDirection::Recv)?;
    match check_rate_limit_and_update_flow(ctx, PacketDirection::Recv, &info) {
        Ok(_) => None,
        Err(err) => Some(AcknowledgementStatus::error(err.into()).into()),
    }
}

/// Takes a send acknowledged with an error back out of its flow, or clears
/// the pending marker of a successful one.
pub fn on_acknowledgement_packet_execute(
    ctx: &mut impl RateLimitExecutionContext,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
) -> Result<(), RateLimitError> {
    let status = serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
        .map_err(|_| RateLimitError::AckDeserialization)?;
    if status.is_successful() {
        RateLimitKeeper::remove_pending_send_packet(ctx.store_mut(), &pending_key(packet))?;
        return Ok(());
    }
    undo_failed_send(ctx, packet)
}

/// Takes a timed out send back out of its flow.
pub fn on_timeout_packet_execute(
    ctx: &mut impl RateLimitExecutionContext,
    packet: &Packet,
) -> Result<(), RateLimitError> {
    undo_failed_send(ctx, packet)
}

fn undo_failed_send(
    ctx: &mut impl RateLimitExecutionContext,
    packet: &Packet,
) -> Result<(), RateLimitError> {
    let Some(info) = RateLimitedPacketInfo::from_packet(packet, PacketDirection::Send) else {
        return Ok(());
    };
    undo_send_packet(
        ctx,
        &info.channel_id,
        packet.seq_on_a,
        &info.denom,
        info.amount,
    )
}
