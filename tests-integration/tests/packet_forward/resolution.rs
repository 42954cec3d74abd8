use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_middleware_packet_forward::module::{
    on_acknowledgement_packet_execute, on_acknowledgement_packet_validate,
    on_recv_packet_execute, on_timeout_packet_execute, on_timeout_packet_validate,
};
use ibc_middleware_packet_forward::types::error::PacketForwardError;
use ibc_middleware_testkit::context::{MockContext, MockContextConfig};
use ibc_middleware_testkit::fixtures::{
    error_ack, relayer, success_ack, ForwardMemoConfig, TransferPacketConfig,
};
use rstest::rstest;
use tests_integration::{attribute, in_flight_packets, is_successful};

const MINUTE: u64 = 60_000_000_000;

/// Receives a transfer to forward with `retries`, returning the original
/// packet and the forwarded one.
fn forward(ctx: &mut MockContext, retries: u8) -> (Packet, Packet) {
    let packet: Packet = TransferPacketConfig::builder()
        .seq_on_a(Sequence::from(11))
        .memo(ForwardMemoConfig::builder().retries(retries).build())
        .build();
    let (_, ack) = on_recv_packet_execute(ctx, &packet, &relayer());
    assert!(ack.is_none());
    ctx.commit();
    (packet, ctx.last_sent_packet())
}

#[test_log::test]
fn timeout_without_retries_refunds_once() {
    let mut ctx = MockContext::default();
    let (original, forwarded) = forward(&mut ctx, 0);

    assert!(on_timeout_packet_validate(&ctx, &forwarded).expect("no error"));
    let (extras, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    result.expect("refunded");

    assert!(in_flight_packets(&ctx).is_empty());
    assert_eq!(ctx.sent_transfers.len(), 1, "no resend");
    assert_eq!(ctx.returned_refunds, vec![forwarded]);
    assert_eq!(ctx.refunds.len(), 1);
    assert_eq!(
        ctx.refunds[0].original_sender_address.as_ref(),
        "cosmos1sender"
    );

    assert_eq!(ctx.written_acks.len(), 1);
    let (acked, ack) = &ctx.written_acks[0];
    assert_eq!(acked, &original);
    assert!(!is_successful(ack));

    assert_eq!(attribute(&extras.events[0], "action"), Some("refund"));
    assert!(ctx.timed_out_packets.is_empty(), "not handed to the next app");
}

#[test_log::test]
fn timeout_with_retries_resends() {
    let mut ctx = MockContext::default();
    let (_, forwarded) = forward(&mut ctx, 2);
    ctx.advance_time(MINUTE);

    let (extras, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    result.expect("resent");

    assert_eq!(ctx.sent_transfers.len(), 2, "exactly one resend");
    assert!(ctx.refunds.is_empty());
    assert!(ctx.written_acks.is_empty());

    let resent = ctx.last_sent_packet();
    assert_ne!(resent.seq_on_a, forwarded.seq_on_a);
    assert_eq!(resent.chan_id_on_a, forwarded.chan_id_on_a);
    assert_eq!(resent.data, forwarded.data);

    let in_flight = in_flight_packets(&ctx);
    assert_eq!(in_flight.len(), 1);
    let (key, record) = &in_flight[0];
    assert_eq!(key.sequence, resent.seq_on_a);
    assert_eq!(record.retries_remaining, 1);
    let (_, transfer) = ctx.sent_transfers.last().expect("resent");
    assert_eq!(
        transfer.timeout_timestamp_on_b,
        ctx.host_timestamp + record.timeout
    );
    assert_eq!(attribute(&extras.events[0], "action"), Some("retry"));
}

#[test]
fn retries_are_exhausted_before_refund() {
    let mut ctx = MockContext::default();
    let (_, mut forwarded) = forward(&mut ctx, 2);

    for retries_left in [1, 0] {
        let (_, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
        result.expect("resent");
        assert_eq!(in_flight_packets(&ctx)[0].1.retries_remaining, retries_left);
        forwarded = ctx.last_sent_packet();
    }
    assert!(ctx.refunds.is_empty());

    let (_, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    result.expect("refunded");
    assert_eq!(ctx.sent_transfers.len(), 3);
    assert_eq!(ctx.refunds.len(), 1);
    assert!(in_flight_packets(&ctx).is_empty());
}

#[test_log::test]
fn success_ack_is_relayed_to_original_packet() {
    let mut ctx = MockContext::default();
    let (original, forwarded) = forward(&mut ctx, 1);

    let ack = success_ack();
    assert!(on_acknowledgement_packet_validate(&ctx, &forwarded, &ack).expect("no error"));
    let (extras, result) =
        on_acknowledgement_packet_execute(&mut ctx, &forwarded, &ack, &relayer());
    result.expect("acknowledged");

    assert!(in_flight_packets(&ctx).is_empty());
    assert_eq!(ctx.written_acks, vec![(original, ack)]);
    assert!(ctx.returned_refunds.is_empty());
    assert!(ctx.refunds.is_empty());
    assert_eq!(attribute(&extras.events[0], "action"), Some("success"));
}

#[rstest]
#[case::retry(1, 2, 0)]
#[case::refund(0, 1, 1)]
fn error_ack_is_a_failure(
    #[case] retries: u8,
    #[case] expected_transfers: usize,
    #[case] expected_refunds: usize,
) {
    let mut ctx = MockContext::default();
    let (_, forwarded) = forward(&mut ctx, retries);

    let (_, result) = on_acknowledgement_packet_execute(
        &mut ctx,
        &forwarded,
        &error_ack("insufficient funds"),
        &relayer(),
    );
    result.expect("resolved");

    assert_eq!(ctx.returned_refunds.len(), 1);
    assert_eq!(ctx.sent_transfers.len(), expected_transfers);
    assert_eq!(ctx.refunds.len(), expected_refunds);
}

#[test]
fn nonrefundable_exhaustion_is_written_off() {
    let mut ctx = MockContextConfig::builder().nonrefundable(true).build();
    let (_, forwarded) = forward(&mut ctx, 0);

    let (extras, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    result.expect("written off");

    assert!(in_flight_packets(&ctx).is_empty());
    assert!(ctx.refunds.is_empty());
    assert!(ctx.written_acks.is_empty());
    assert_eq!(attribute(&extras.events[0], "action"), Some("write_off"));
}

#[test]
fn failed_refund_keeps_record() {
    let mut ctx = MockContext::default();
    let (_, forwarded) = forward(&mut ctx, 0);
    let before = in_flight_packets(&ctx);

    ctx.fail_refund = true;
    let (_, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    assert!(matches!(result, Err(PacketForwardError::Host { .. })));
    ctx.revert();

    assert_eq!(in_flight_packets(&ctx), before);
    assert!(ctx.written_acks.is_empty());

    // the refund goes through once the host recovers
    ctx.fail_refund = false;
    let (_, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    result.expect("refunded");
    assert_eq!(ctx.refunds.len(), 1);
    assert!(in_flight_packets(&ctx).is_empty());
}

#[test]
fn failed_resend_keeps_record() {
    let mut ctx = MockContext::default();
    let (_, forwarded) = forward(&mut ctx, 3);
    let before = in_flight_packets(&ctx);

    ctx.fail_send_transfer = true;
    let (_, result) = on_timeout_packet_execute(&mut ctx, &forwarded, &relayer());
    assert!(result.is_err());
    assert_eq!(in_flight_packets(&ctx), before);
}

#[test]
fn packets_not_forwarded_go_to_next_app() {
    let mut ctx = MockContext::default();
    let packet: Packet = TransferPacketConfig::builder()
        .chan_id_on_a(ChannelId::new(4))
        .build();

    assert!(!on_timeout_packet_validate(&ctx, &packet).expect("no error"));
    let (_, result) = on_timeout_packet_execute(&mut ctx, &packet, &relayer());
    result.expect("handled by the next app");
    assert_eq!(ctx.timed_out_packets, vec![packet.clone()]);

    let (_, result) =
        on_acknowledgement_packet_execute(&mut ctx, &packet, &success_ack(), &relayer());
    result.expect("handled by the next app");
    assert_eq!(ctx.acknowledged_packets, vec![packet]);
    assert!(ctx.written_acks.is_empty());
}
