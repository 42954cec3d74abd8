use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{Amount, Memo, PrefixedCoin};
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::events::{ForwardAction, PacketForwardEvent};
use ibc_middleware_packet_forward_types::{ForwardMetadata, InFlightPacket, InFlightPacketKey};
use tracing::debug;

use super::{denom_on_receiver, forward_timeout_timestamp, packet_timeouts};
use crate::context::{ForwardTransfer, PacketForwardExecutionContext};
use crate::registry::InFlightPacketRegistry;

/// Receives `packet` through the wrapped application on behalf of an
/// intermediate account and forwards the received tokens as instructed by
/// `metadata`.
///
/// On success no acknowledgement is returned: the original packet is
/// acknowledged once the forwarded one is resolved. A failure after the
/// wrapped application accepted the packet yields an error acknowledgement,
/// and the host is expected to discard the state changes of the receive.
pub fn forward_recv_packet_execute<Ctx: PacketForwardExecutionContext>(
    ctx: &mut Ctx,
    packet: &Packet,
    data: PacketData,
    metadata: ForwardMetadata,
    relayer: &Signer,
) -> (ModuleExtras, Option<Acknowledgement>) {
    let intermediate = match ctx.override_receiver(&packet.chan_id_on_b, &data.sender) {
        Ok(intermediate) => intermediate,
        Err(err) => return (ModuleExtras::empty(), Some(error_ack(err))),
    };

    let rewritten_packet = {
        let rewritten_data = PacketData {
            receiver: intermediate.clone(),
            memo: Memo::from(String::new()),
            ..data.clone()
        };
        match serde_json::to_vec(&rewritten_data) {
            Ok(bytes) => Packet {
                data: bytes,
                ..packet.clone()
            },
            Err(_) => {
                return (
                    ModuleExtras::empty(),
                    Some(error_ack(PacketForwardError::PacketDataSerialization)),
                )
            }
        }
    };

    let (mut extras, ack) = ctx.next_on_recv_packet_execute(&rewritten_packet, relayer);
    let Some(ack) = ack else {
        return (extras, None);
    };
    let accepted = serde_json::from_slice::<AcknowledgementStatus>(ack.as_ref())
        .map(|status| status.is_successful())
        .unwrap_or(false);
    if !accepted {
        return (extras, Some(ack));
    }

    match process_forward(ctx, packet, data, metadata, intermediate) {
        Ok(event) => {
            extras.events.push(event.into());
            extras.log.push("packet forwarded".to_string());
            (extras, None)
        }
        Err(err) => (extras, Some(error_ack(err))),
    }
}

fn process_forward<Ctx: PacketForwardExecutionContext>(
    ctx: &mut Ctx,
    packet: &Packet,
    data: PacketData,
    metadata: ForwardMetadata,
    intermediate: Signer,
) -> Result<PacketForwardEvent, PacketForwardError> {
    let params = InFlightPacketRegistry::params(ctx.store())?;
    let denom = denom_on_receiver(packet, &data.token.denom);

    let amount = *data.token.amount.as_ref();
    let fee = Amount::from(params.fee_percentage.mul_round_half_even(amount)?);
    let forwarded_amount =
        data.token
            .amount
            .checked_sub(fee)
            .ok_or_else(|| PacketForwardError::InvalidAmount {
                reason: format!("fee {fee} exceeds amount {}", data.token.amount),
            })?;

    let timeout = metadata
        .timeout
        .unwrap_or_else(|| ctx.default_forward_timeout());
    let retries = metadata
        .retries
        .unwrap_or_else(|| ctx.default_forward_retries());
    let timeout_timestamp_on_b = forward_timeout_timestamp(ctx.host_timestamp()?, timeout)?;
    let nonrefundable = ctx.is_nonrefundable(packet, &data);
    let (packet_timeout_timestamp, packet_timeout_height) = packet_timeouts(packet);

    if !fee.as_ref().is_zero() {
        debug!(%fee, %denom, "paying forward fee");
        ctx.send_fee_execute(
            &intermediate,
            &PrefixedCoin {
                denom: denom.clone(),
                amount: fee,
            },
        )?;
    }

    let sequence = ctx.send_transfer_execute(ForwardTransfer {
        port_id_on_a: metadata.port.clone(),
        chan_id_on_a: metadata.channel.clone(),
        token: PrefixedCoin {
            denom,
            amount: forwarded_amount,
        },
        sender: intermediate,
        receiver: metadata.receiver,
        memo: Memo::from(metadata.next.unwrap_or_default()),
        timeout_timestamp_on_b,
    })?;

    let key = InFlightPacketKey::new(metadata.channel, metadata.port, sequence);
    let in_flight = InFlightPacket {
        original_sender_address: data.sender,
        refund_channel_id: packet.chan_id_on_b.clone(),
        refund_port_id: packet.port_id_on_b.clone(),
        packet_src_channel_id: packet.chan_id_on_a.clone(),
        packet_src_port_id: packet.port_id_on_a.clone(),
        packet_timeout_timestamp,
        packet_timeout_height,
        packet_data: packet.data.clone(),
        refund_sequence: packet.seq_on_a,
        retries_remaining: retries,
        timeout,
        nonrefundable,
    };
    InFlightPacketRegistry::put(ctx.store_mut(), key.clone(), &in_flight)?;
    debug!(%key, refund_key = %in_flight.refund_key(), "forwarded packet");

    Ok(PacketForwardEvent {
        action: ForwardAction::Forward,
        forward_key: key,
        original_sender: in_flight.original_sender_address,
        refund_channel_id: in_flight.refund_channel_id,
        refund_sequence: in_flight.refund_sequence,
        retries_remaining: in_flight.retries_remaining,
        error: None,
    })
}

fn error_ack(err: PacketForwardError) -> Acknowledgement {
    AcknowledgementStatus::error(err.into()).into()
}
