use ibc_app_transfer_types::Amount;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_middleware_primitives::ibc_denom;
use ibc_middleware_rate_limit::keeper::RateLimitKeeper;
use ibc_middleware_rate_limit::module::{
    on_acknowledgement_packet_execute, on_recv_packet_execute, on_send_packet_execute,
    on_timeout_packet_execute,
};
use ibc_middleware_rate_limit::types::error::RateLimitError;
use ibc_middleware_rate_limit::types::{
    Flow, PendingSendPacketKey, RateLimit, RateLimitKey, WhitelistedAddressPair,
};
use ibc_middleware_testkit::context::{MockContext, MockContextConfig};
use ibc_middleware_testkit::fixtures::{
    error_ack, success_ack, RateLimitConfig, TransferPacketConfig,
};
use tests_integration::{attribute, is_successful};

const DAY: u64 = 24 * 60 * 60 * 1_000_000_000;

/// A host with a 10% daily quota on `uatom` over `channel-0`, and a channel
/// value of 1000.
fn limited_host() -> MockContext {
    let mut ctx = MockContextConfig::builder()
        .channel_values([("uatom".to_string(), Amount::from(1_000u64))].into())
        .build();
    let rate_limit: RateLimit = RateLimitConfig::builder().duration_hours(24).build();
    RateLimitKeeper::set_rate_limit(&mut ctx.store, &rate_limit).expect("valid rate limit");
    ctx
}

fn outgoing(sequence: u64, amount: u64) -> Packet {
    TransferPacketConfig::builder()
        .seq_on_a(Sequence::from(sequence))
        .chan_id_on_a(ChannelId::new(0))
        .amount(amount)
        .build()
}

fn flow(ctx: &MockContext) -> Flow {
    RateLimitKeeper::get_rate_limit(&ctx.store, &RateLimitKey::new("uatom", ChannelId::new(0)))
        .expect("no error")
        .expect("rate limit exists")
        .flow
}

fn pending(ctx: &MockContext, sequence: u64) -> Option<u64> {
    RateLimitKeeper::get_pending_send_packet(
        &ctx.store,
        &PendingSendPacketKey::new(ChannelId::new(0), Sequence::from(sequence)),
    )
    .expect("no error")
}

#[test_log::test]
fn sends_are_bounded_by_the_window_quota() {
    let mut ctx = limited_host();

    on_send_packet_execute(&mut ctx, &outgoing(1, 50)).expect("within quota");
    assert_eq!(flow(&ctx).outflow, Amount::from(50u64));

    let err = on_send_packet_execute(&mut ctx, &outgoing(2, 60)).expect_err("exceeds quota");
    assert!(matches!(err, RateLimitError::QuotaExceeded { .. }));
    assert_eq!(flow(&ctx).outflow, Amount::from(50u64));
    assert_eq!(pending(&ctx, 2), None);

    let event = ctx.events.last().expect("denial event");
    assert_eq!(event.kind, "transfer_denied");
    assert_eq!(attribute(event, "reason"), Some("rate_limit_exceeded"));
    assert_eq!(attribute(event, "action"), Some("packet_send"));
    assert_eq!(attribute(event, "amount"), Some("60"));

    ctx.advance_time(DAY);
    on_send_packet_execute(&mut ctx, &outgoing(3, 60)).expect("new window");
    assert_eq!(flow(&ctx).outflow, Amount::from(60u64));
}

#[test_log::test]
fn pending_marker_follows_the_send_outcome() {
    let mut ctx = limited_host();

    on_send_packet_execute(&mut ctx, &outgoing(1, 30)).expect("within quota");
    let window_start = flow(&ctx).window_start;
    assert_eq!(pending(&ctx, 1), Some(window_start));

    on_acknowledgement_packet_execute(&mut ctx, &outgoing(1, 30), &success_ack())
        .expect("no error");
    assert_eq!(pending(&ctx, 1), None);
    assert_eq!(flow(&ctx).outflow, Amount::from(30u64));

    on_send_packet_execute(&mut ctx, &outgoing(2, 20)).expect("within quota");
    on_acknowledgement_packet_execute(&mut ctx, &outgoing(2, 20), &error_ack("failed"))
        .expect("no error");
    assert_eq!(pending(&ctx, 2), None);
    assert_eq!(flow(&ctx).outflow, Amount::from(30u64));

    on_send_packet_execute(&mut ctx, &outgoing(3, 40)).expect("within quota");
    on_timeout_packet_execute(&mut ctx, &outgoing(3, 40)).expect("no error");
    assert_eq!(pending(&ctx, 3), None);
    assert_eq!(flow(&ctx).outflow, Amount::from(30u64));
}

#[test]
fn undo_after_rollover_leaves_new_window_untouched() {
    let mut ctx = limited_host();

    on_send_packet_execute(&mut ctx, &outgoing(1, 50)).expect("within quota");
    ctx.advance_time(DAY);
    on_send_packet_execute(&mut ctx, &outgoing(2, 10)).expect("new window");

    on_timeout_packet_execute(&mut ctx, &outgoing(1, 50)).expect("no error");
    assert_eq!(flow(&ctx).outflow, Amount::from(10u64));
    assert_eq!(pending(&ctx, 1), None);
    assert!(pending(&ctx, 2).is_some());
}

#[test]
fn blacklisted_denom_is_always_denied() {
    let mut ctx = limited_host();
    RateLimitKeeper::add_denom_to_blacklist(&mut ctx.store, "uatom").expect("no error");

    let err = on_send_packet_execute(&mut ctx, &outgoing(1, 1)).expect_err("blacklisted");
    assert!(matches!(err, RateLimitError::DenomIsBlacklisted { .. }));
    assert_eq!(flow(&ctx), Flow::default());
    assert_eq!(
        attribute(ctx.events.last().expect("denial event"), "reason"),
        Some("blacklisted_denom")
    );
}

#[test]
fn whitelisted_pair_bypasses_the_quota() {
    let mut ctx = limited_host();
    let pair = WhitelistedAddressPair::new(
        "cosmos1sender".to_string().into(),
        "cosmos1receiver".to_string().into(),
    );
    RateLimitKeeper::set_whitelisted_address_pair(&mut ctx.store, &pair).expect("no error");

    on_send_packet_execute(&mut ctx, &outgoing(1, 5_000)).expect("whitelisted");
    assert_eq!(flow(&ctx), Flow::default());
    assert_eq!(pending(&ctx, 1), None);
    assert!(ctx.events.is_empty());
}

#[test_log::test]
fn denied_receive_is_answered_with_error_ack() {
    // vouchers of `uatom` received on channel-1
    let voucher = ibc_denom("transfer/channel-1/uatom");
    let mut ctx = MockContextConfig::builder()
        .channel_values([(voucher.clone(), Amount::from(1_000u64))].into())
        .build();
    let rate_limit: RateLimit = RateLimitConfig::builder()
        .denom(voucher.clone())
        .channel_id(ChannelId::new(1))
        .build();
    RateLimitKeeper::set_rate_limit(&mut ctx.store, &rate_limit).expect("valid rate limit");

    let incoming = |amount: u64| -> Packet {
        TransferPacketConfig::builder()
            .chan_id_on_b(ChannelId::new(1))
            .amount(amount)
            .build()
    };

    assert!(on_recv_packet_execute(&mut ctx, &incoming(100)).is_none());
    let ack = on_recv_packet_execute(&mut ctx, &incoming(1)).expect("denied");
    assert!(!is_successful(&ack));

    let rate_limit = RateLimitKeeper::get_rate_limit(&ctx.store, &rate_limit.path)
        .expect("no error")
        .expect("rate limit exists");
    assert_eq!(rate_limit.flow.inflow, Amount::from(100u64));
    let event = ctx.events.last().expect("denial event");
    assert_eq!(attribute(event, "action"), Some("packet_recv"));
    assert_eq!(attribute(event, "denom"), Some(voucher.as_str()));
    assert_eq!(attribute(event, "channel"), Some("channel-1"));
}

#[test]
fn transfers_without_rate_limit_are_not_tracked() {
    let mut ctx = MockContext::default();
    on_send_packet_execute(&mut ctx, &outgoing(1, 1_000_000)).expect("unlimited");
    assert_eq!(pending(&ctx, 1), None);
    on_timeout_packet_execute(&mut ctx, &outgoing(1, 1_000_000)).expect("no error");
    assert!(RateLimitKeeper::get_all_rate_limits(&ctx.store)
        .expect("no error")
        .is_empty());
}
