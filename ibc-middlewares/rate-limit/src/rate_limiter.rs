//! Quota accounting of transfers and its undo for sends that failed.
use ibc_app_transfer_types::Amount;
use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_middleware_primitives::U256;
use ibc_middleware_rate_limit_types::error::RateLimitError;
use ibc_middleware_rate_limit_types::events::TransferDeniedEvent;
use ibc_middleware_rate_limit_types::{
    PacketDirection, PendingSendPacketKey, RateLimit, RateLimitKey,
};
use tracing::{debug, warn};

use crate::context::RateLimitExecutionContext;
use crate::keeper::RateLimitKeeper;
use crate::packet::RateLimitedPacketInfo;

/// Adds `amount` to the flow of `rate_limit` in `direction`, opening a new
/// window first when the current one is over.
///
/// A zero `channel_value` leaves the flow unbounded. On error `rate_limit`
/// is left unchanged.
pub fn update_flow(
    rate_limit: &mut RateLimit,
    direction: PacketDirection,
    amount: Amount,
    channel_value: Amount,
    now: u64,
) -> Result<(), RateLimitError> {
    let mut flow = rate_limit.flow.clone();
    if flow.is_expired(now) {
        flow.roll_over(now, rate_limit.quota.duration_nanos());
    }

    let threshold = if channel_value.as_ref().is_zero() {
        Amount::from(U256::MAX)
    } else {
        rate_limit.quota.threshold(direction, channel_value)?
    };
    let added = match direction {
        PacketDirection::Send => flow.add_outflow(amount, threshold),
        PacketDirection::Recv => flow.add_inflow(amount, threshold),
    };
    added.map_err(|threshold| RateLimitError::QuotaExceeded {
        denom: rate_limit.path.denom.clone(),
        channel_id: rate_limit.path.channel_id.clone(),
        direction,
        amount,
        threshold,
    })?;

    rate_limit.flow = flow;
    Ok(())
}

/// Counts the transfer described by `info` against its rate limit.
///
/// Returns whether a flow was updated: transfers of denoms without a rate
/// limit and transfers between whitelisted addresses are not counted.
pub fn check_rate_limit_and_update_flow<Ctx>(
    ctx: &mut Ctx,
    direction: PacketDirection,
    info: &RateLimitedPacketInfo,
) -> Result<bool, RateLimitError>
where
    Ctx: RateLimitExecutionContext,
{
    if RateLimitKeeper::is_denom_blacklisted(ctx.store(), &info.denom)? {
        let err = RateLimitError::DenomIsBlacklisted {
            denom: info.denom.clone(),
        };
        warn!(
            denom = %info.denom,
            channel = %info.channel_id,
            %direction,
            "denied transfer of blacklisted denom"
        );
        ctx.emit_event(
            TransferDeniedEvent::blacklisted_denom(
                info.denom.clone(),
                info.channel_id.clone(),
                direction,
                info.amount,
                err.to_string(),
            )
            .into(),
        )?;
        return Err(err);
    }

    let key = RateLimitKey::new(info.denom.clone(), info.channel_id.clone());
    let Some(mut rate_limit) = RateLimitKeeper::get_rate_limit(ctx.store(), &key)? else {
        return Ok(false);
    };

    if RateLimitKeeper::is_address_pair_whitelisted(ctx.store(), &info.sender, &info.receiver)? {
        debug!(sender = %info.sender, receiver = %info.receiver, "skipping whitelisted transfer");
        return Ok(false);
    }

    let channel_value = ctx.channel_value(&info.denom)?;
    let now = ctx.host_timestamp()?;
    if let Err(err) = update_flow(&mut rate_limit, direction, info.amount, channel_value, now) {
        warn!(
            denom = %info.denom,
            channel = %info.channel_id,
            %direction,
            "denied transfer: {err}"
        );
        if matches!(err, RateLimitError::QuotaExceeded { .. }) {
            ctx.emit_event(
                TransferDeniedEvent::rate_limit_exceeded(
                    info.denom.clone(),
                    info.channel_id.clone(),
                    direction,
                    info.amount,
                    err.to_string(),
                )
                .into(),
            )?;
        }
        return Err(err);
    }

    debug!(
        denom = %info.denom,
        channel = %info.channel_id,
        %direction,
        inflow = %rate_limit.flow.inflow,
        outflow = %rate_limit.flow.outflow,
        "updated flow"
    );
    RateLimitKeeper::set_rate_limit(ctx.store_mut(), &rate_limit)?;
    Ok(true)
}

/// Takes a failed send back out of the outflow it was counted in.
///
/// The outflow is only decreased while the window the send was counted in
/// is still the current one. The pending marker of the send is removed in
/// every case.
pub fn undo_send_packet<Ctx>(
    ctx: &mut Ctx,
    channel_id: &ChannelId,
    sequence: Sequence,
    denom: &str,
    amount: Amount,
) -> Result<(), RateLimitError>
where
    Ctx: RateLimitExecutionContext,
{
    let pending_key = PendingSendPacketKey::new(channel_id.clone(), sequence);
    let pending = RateLimitKeeper::get_pending_send_packet(ctx.store(), &pending_key)?;
    let key = RateLimitKey::new(denom, channel_id.clone());

    let Some(mut rate_limit) = RateLimitKeeper::get_rate_limit(ctx.store(), &key)? else {
        if pending.is_some() {
            RateLimitKeeper::remove_pending_send_packet(ctx.store_mut(), &pending_key)?;
        }
        return Ok(());
    };

    let now = ctx.host_timestamp()?;
    match pending {
        Some(window_start)
            if window_start == rate_limit.flow.window_start && !rate_limit.flow.is_expired(now) =>
        {
            rate_limit.flow.remove_outflow(amount)?;
            debug!(%denom, channel = %channel_id, %sequence, %amount, "undid send");
            RateLimitKeeper::set_rate_limit(ctx.store_mut(), &rate_limit)?;
            RateLimitKeeper::remove_pending_send_packet(ctx.store_mut(), &pending_key)?;
        }
        Some(_) => {
            debug!(%denom, channel = %channel_id, %sequence, "send belongs to a closed window");
            RateLimitKeeper::remove_pending_send_packet(ctx.store_mut(), &pending_key)?;
        }
        None => {}
    }
    Ok(())
}
