use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::Amount;
use ibc_middleware_packet_forward::module::on_recv_packet_execute;
use ibc_middleware_packet_forward::registry::InFlightPacketRegistry;
use ibc_middleware_packet_forward::types::{
    InFlightPacketKey, Params, PacketTimeoutHeight, DEFAULT_FORWARD_TIMEOUT,
};
use ibc_middleware_primitives::Dec;
use ibc_middleware_testkit::context::{
    intermediate_account, MockContext, MockContextConfig, NextAppAck, DEFAULT_HOST_TIMESTAMP,
};
use ibc_middleware_testkit::fixtures::{
    relayer, ForwardMemoConfig, TransferPacketConfig, DEFAULT_PACKET_TIMEOUT,
};
use serde_json::json;
use tests_integration::{attribute, in_flight_packets, is_successful};

fn forward_packet(memo: String, amount: u64) -> Packet {
    TransferPacketConfig::builder()
        .seq_on_a(Sequence::from(5))
        .amount(amount)
        .memo(memo)
        .build()
}

#[test_log::test]
fn forwards_received_transfer_minus_fee() {
    let mut ctx = MockContext::default();
    InFlightPacketRegistry::set_params(
        &mut ctx.store,
        &Params::new("0.1".parse::<Dec>().expect("valid decimal")).expect("valid params"),
    )
    .expect("no error");

    let packet = forward_packet(ForwardMemoConfig::builder().build(), 1_000);
    let (extras, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());
    assert!(ack.is_none(), "forwarded packets are acknowledged asynchronously");

    let intermediate =
        intermediate_account(&ChannelId::new(1), &"cosmos1sender".to_string().into());

    // the wrapped application credited the intermediate account
    assert_eq!(ctx.received_packets.len(), 1);
    let received: PacketData =
        serde_json::from_slice(&ctx.received_packets[0].data).expect("ICS-20 data");
    assert_eq!(received.receiver, intermediate);
    assert_eq!(received.memo.as_ref(), "");
    assert_eq!(received.token.amount, Amount::from(1_000u64));

    assert_eq!(ctx.fees.len(), 1);
    assert_eq!(ctx.fees[0].0, intermediate);
    assert_eq!(ctx.fees[0].1.amount, Amount::from(100u64));
    assert_eq!(ctx.fees[0].1.denom.to_string(), "transfer/channel-1/uatom");

    assert_eq!(ctx.sent_transfers.len(), 1);
    let (sequence, transfer) = &ctx.sent_transfers[0];
    assert_eq!(transfer.chan_id_on_a, ChannelId::new(2));
    assert_eq!(transfer.port_id_on_a, PortId::transfer());
    assert_eq!(transfer.sender, intermediate);
    assert_eq!(transfer.receiver.as_ref(), "cosmos1final");
    assert_eq!(transfer.token.amount, Amount::from(900u64));
    assert_eq!(transfer.token.denom.to_string(), "transfer/channel-1/uatom");
    assert_eq!(transfer.memo.as_ref(), "");
    assert_eq!(
        transfer.timeout_timestamp_on_b,
        DEFAULT_HOST_TIMESTAMP + DEFAULT_FORWARD_TIMEOUT
    );

    let in_flight = in_flight_packets(&ctx);
    assert_eq!(in_flight.len(), 1);
    let (key, record) = &in_flight[0];
    assert_eq!(
        key,
        &InFlightPacketKey::new(ChannelId::new(2), PortId::transfer(), *sequence)
    );
    assert_eq!(record.original_sender_address.as_ref(), "cosmos1sender");
    assert_eq!(record.refund_channel_id, ChannelId::new(1));
    assert_eq!(record.refund_port_id, PortId::transfer());
    assert_eq!(record.packet_src_channel_id, ChannelId::new(0));
    assert_eq!(record.refund_sequence, Sequence::from(5));
    assert_eq!(record.packet_timeout_timestamp, DEFAULT_PACKET_TIMEOUT);
    assert_eq!(record.packet_timeout_height, PacketTimeoutHeight::new(1, 1_000));
    assert_eq!(record.packet_data, packet.data);
    assert_eq!(record.retries_remaining, 0);
    assert_eq!(record.timeout, DEFAULT_FORWARD_TIMEOUT);
    assert!(!record.nonrefundable);

    assert_eq!(extras.events.len(), 1);
    assert_eq!(attribute(&extras.events[0], "action"), Some("forward"));
}

#[test]
fn zero_fee_is_not_collected() {
    let mut ctx = MockContext::default();
    let packet = forward_packet(ForwardMemoConfig::builder().build(), 1_000);
    let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(ack.is_none());
    assert!(ctx.fees.is_empty());
    assert_eq!(ctx.sent_transfers[0].1.token.amount, Amount::from(1_000u64));
}

#[test]
fn metadata_overrides_defaults() {
    let mut ctx = MockContextConfig::builder().nonrefundable(true).build();
    let next = json!({"forward": {"receiver": "cosmos1last", "port": "transfer", "channel": "channel-7"}});
    let memo = ForwardMemoConfig::builder()
        .timeout(json!("10m"))
        .retries(2)
        .next(next.clone())
        .build();
    let (_, ack) = on_recv_packet_execute(&mut ctx, &forward_packet(memo, 10), &relayer());
    assert!(ack.is_none());

    let transfer = &ctx.sent_transfers[0].1;
    assert_eq!(transfer.timeout_timestamp_on_b, DEFAULT_HOST_TIMESTAMP + 600_000_000_000);
    let forwarded_memo: serde_json::Value =
        serde_json::from_str(transfer.memo.as_ref()).expect("JSON memo");
    assert_eq!(forwarded_memo, next);

    let (_, record) = &in_flight_packets(&ctx)[0];
    assert_eq!(record.retries_remaining, 2);
    assert_eq!(record.timeout, 600_000_000_000);
    assert!(record.nonrefundable);
}

#[test]
fn transfers_without_forward_go_to_next_app() {
    let mut ctx = MockContext::default();
    let packet = forward_packet(r#"{"wasm":{"contract":"cosmos1contract"}}"#.to_string(), 10);
    let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(is_successful(&ack.expect("synchronous acknowledgement")));
    assert_eq!(ctx.received_packets, vec![packet]);
    assert!(ctx.sent_transfers.is_empty());
    assert!(in_flight_packets(&ctx).is_empty());
}

#[test]
fn invalid_forward_metadata_is_rejected() {
    let mut ctx = MockContext::default();
    let memo = json!({"forward": {"receiver": "", "port": "transfer", "channel": "channel-2"}});
    let packet = forward_packet(memo.to_string(), 10);
    let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(!is_successful(&ack.expect("synchronous acknowledgement")));
    assert!(ctx.received_packets.is_empty());
    assert!(ctx.sent_transfers.is_empty());
}

#[test]
fn rejected_receive_is_not_forwarded() {
    let mut ctx = MockContextConfig::builder()
        .next_app_ack(NextAppAck::Error("receiver blocked".to_string()))
        .build();
    let packet = forward_packet(ForwardMemoConfig::builder().build(), 10);
    let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(!is_successful(&ack.expect("synchronous acknowledgement")));
    assert!(ctx.sent_transfers.is_empty());
    assert!(in_flight_packets(&ctx).is_empty());
}

#[test]
fn failed_forward_send_is_rejected_and_not_recorded() {
    let mut ctx = MockContext::default();
    ctx.fail_send_transfer = true;
    let packet = forward_packet(ForwardMemoConfig::builder().build(), 10);
    let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(!is_successful(&ack.expect("synchronous acknowledgement")));
    assert!(in_flight_packets(&ctx).is_empty());
}

#[test]
fn returning_tokens_are_unwound() {
    let mut ctx = MockContext::default();
    // a voucher of this chain coming back from channel-0 of the counterparty
    let packet: Packet = TransferPacketConfig::builder()
        .denom("transfer/channel-0/uosmo")
        .memo(ForwardMemoConfig::builder().build())
        .build();
    let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(ack.is_none());
    assert_eq!(ctx.sent_transfers[0].1.token.denom.to_string(), "uosmo");
}
