use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_middleware_packet_forward::genesis::{export_genesis, init_genesis};
use ibc_middleware_packet_forward::module::{on_recv_packet_execute, on_timeout_packet_execute};
use ibc_middleware_packet_forward::types::proto::GenesisState as RawGenesisState;
use ibc_middleware_packet_forward::types::GenesisState;
use ibc_middleware_testkit::context::{MockContext, MockContextConfig};
use ibc_middleware_testkit::fixtures::{relayer, ForwardMemoConfig, TransferPacketConfig};
use ibc_proto::Protobuf;
use tests_integration::in_flight_packets;

#[test_log::test]
fn exported_state_resumes_on_another_host() {
    // forwards get sequences 9, 10 and 11
    let mut ctx = MockContextConfig::builder().next_sequence(9).build();
    for (sequence, channel) in [(1, 2), (2, 3), (3, 2)] {
        let packet: Packet = TransferPacketConfig::builder()
            .seq_on_a(Sequence::from(sequence))
            .memo(
                ForwardMemoConfig::builder()
                    .channel(ChannelId::new(channel))
                    .build(),
            )
            .build();
        let (_, ack) = on_recv_packet_execute(&mut ctx, &packet, &relayer());
        assert!(ack.is_none());
    }

    let exported = export_genesis(&ctx.store).expect("no error");
    let keys: Vec<_> = exported.in_flight_packets.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            "channel-2/transfer/11",
            "channel-2/transfer/9",
            "channel-3/transfer/10",
        ]
    );

    let bytes = Protobuf::<RawGenesisState>::encode_vec(exported.clone());
    let decoded =
        <GenesisState as Protobuf<RawGenesisState>>::decode_vec(&bytes).expect("valid encoding");
    assert_eq!(decoded, exported);

    let mut restored = MockContext::default();
    init_genesis(&mut restored.store, &decoded).expect("valid genesis");
    assert_eq!(in_flight_packets(&restored), in_flight_packets(&ctx));

    // the forward of the second packet times out on the restored host
    let forwarded = ctx.sent_packet(Sequence::from(10));
    let (_, result) = on_timeout_packet_execute(&mut restored, &forwarded, &relayer());
    result.expect("refunded");
    assert_eq!(restored.refunds.len(), 1);
    assert_eq!(restored.refunds[0].refund_sequence, Sequence::from(2));
    assert_eq!(in_flight_packets(&restored).len(), 2);
}
